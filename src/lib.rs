//! # Waste Forecast Workspace
//!
//! Umbrella crate for the waste collection forecasting workspace. It
//! re-exports the forecasting library and the numerical kernel beneath it.
//!
//! ## Example
//!
//! ```
//! use waste_forecast_workspace::forecast::{recommend, ExtraCollectionPolicy};
//!
//! assert!(recommend(701.0));
//! assert!(!recommend(700.0));
//!
//! let policy = ExtraCollectionPolicy::new(650.0).unwrap();
//! assert!(policy.recommends_extra(700.0));
//! ```

/// Forecasting engine: loading, encoding, fitting and predicting
pub use waste_forecast as forecast;

/// Least squares, data splits and regression metrics
pub use waste_math as math;
