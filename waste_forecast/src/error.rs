//! Error types for the waste_forecast crate

use chrono::NaiveDate;
use thiserror::Error;
use waste_math::MathError;

/// Custom error types for the waste_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required column is absent from the source data
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A date field does not match `DD/MM/YYYY`
    #[error("Date parse error on line {line}: '{value}' is not a DD/MM/YYYY date")]
    DateParse { line: u64, value: String },

    /// A field other than the date could not be interpreted
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// Two rows assign different categories to the same zone
    #[error("Zone '{zone}' is listed as both '{first}' and '{second}'")]
    ConflictingZoneCategory {
        zone: String,
        first: String,
        second: String,
    },

    /// A record handed to `Dataset::new` with a negative or non-finite mass
    #[error("Invalid quantity at record index {index}: {quantity_kg} is not a non-negative number of kg")]
    InvalidQuantity { index: usize, quantity_kg: f64 },

    /// A zone category that was not part of the fitted encoding
    #[error("Unknown zone category: {0}")]
    UnknownCategory(String),

    /// A zone that does not appear in the dataset
    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    /// Too few rows, or a degenerate target, to fit a model
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Prediction requested before a successful fit
    #[error("Model has not been fit")]
    ModelNotFit,

    /// Forecast range whose end does not come after its start
    #[error("Invalid range: end date {end} must be after start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the CSV reader or writer
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error from JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the regression kernel
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Csv(err.to_string())
    }
}

impl From<config::ConfigError> for ForecastError {
    fn from(err: config::ConfigError) -> Self {
        ForecastError::Config(err.to_string())
    }
}
