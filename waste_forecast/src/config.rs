//! Forecast settings
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, and `WASTE_FORECAST_*` environment variables
//! (for example `WASTE_FORECAST_EXTRA_COLLECTION_THRESHOLD_KG=650`).

use crate::error::{ForecastError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Predicted mass above which an extra collection is recommended
pub const DEFAULT_EXTRA_COLLECTION_THRESHOLD_KG: f64 = 700.0;
/// Share of rows held out for evaluation
pub const DEFAULT_TEST_RATIO: f64 = 0.2;
/// Seed for the train/test shuffle
pub const DEFAULT_SEED: u64 = 42;
/// Fewest rows a fit accepts
pub const DEFAULT_MIN_TRAINING_ROWS: usize = 2;

const ENV_PREFIX: &str = "WASTE_FORECAST";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub extra_collection_threshold_kg: f64,
    pub test_ratio: f64,
    pub seed: u64,
    pub min_training_rows: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            extra_collection_threshold_kg: DEFAULT_EXTRA_COLLECTION_THRESHOLD_KG,
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
            min_training_rows: DEFAULT_MIN_TRAINING_ROWS,
        }
    }
}

impl ForecastConfig {
    /// Load settings, layering an optional file and the environment over the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "reading forecast configuration");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Replace the recommendation threshold
    pub fn with_threshold(mut self, threshold_kg: f64) -> Self {
        self.extra_collection_threshold_kg = threshold_kg;
        self
    }

    /// Replace the shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.extra_collection_threshold_kg.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Extra collection threshold must be a finite number".to_string(),
            ));
        }

        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Test ratio must be between 0 and 1, got {}",
                self.test_ratio
            )));
        }

        if self.min_training_rows < DEFAULT_MIN_TRAINING_ROWS {
            return Err(ForecastError::InvalidParameter(format!(
                "At least {} training rows are required, got {}",
                DEFAULT_MIN_TRAINING_ROWS, self.min_training_rows
            )));
        }

        Ok(())
    }
}
