//! # Waste Forecast
//!
//! A Rust library for forecasting daily waste collection volume per zone.
//!
//! ## Features
//!
//! - Loading collection history from CSV spreadsheets
//! - Encoding calendar and zone attributes into regression features
//! - Ordinary least squares model with a reproducible hold-out evaluation
//! - Ranged and weekly forecasts with an extra-collection recommendation
//! - A shared forecaster for hosts that predict concurrently
//! - CSV and JSON export of predictions
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use waste_forecast::{ForecastRequest, Forecaster, SyntheticDataset};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let dataset = SyntheticDataset::new(start, 56).generate()?;
//!
//! let mut forecaster: Forecaster = Forecaster::default();
//! let encoding = forecaster.fit_dataset(&dataset)?;
//!
//! let request = ForecastRequest::new(
//!     "Centro",
//!     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
//! );
//! let predictions = forecaster.forecast_zone(&encoding, &dataset, &request)?;
//! assert_eq!(predictions.len(), 14);
//! # Ok::<(), waste_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod encoding;
pub mod error;
pub mod export;
pub mod forecaster;
pub mod models;
pub mod prediction;
pub mod recommendation;
pub mod shared;
pub mod synthetic;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, Dataset, HistoricalRecord, ZoneSummary};
pub use crate::encoding::{
    day_of_week, encode, encode_query, fit_category_encoding, CategoryEncoding,
    EncodedFeatureVector,
};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::Forecaster;
pub use crate::models::linear::{LinearRegressionModel, TrainedLinearModel};
pub use crate::models::{ForecastModel, ModelEvaluation, TrainedForecastModel, TrainingExample};
pub use crate::prediction::{forecast_dates, ForecastRequest, Prediction};
pub use crate::recommendation::{recommend, ExtraCollectionPolicy};
pub use crate::shared::SharedForecaster;
pub use crate::synthetic::SyntheticDataset;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
