//! Extra collection recommendation rule

use crate::config::DEFAULT_EXTRA_COLLECTION_THRESHOLD_KG;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Threshold rule that flags days needing an extra collection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraCollectionPolicy {
    threshold_kg: f64,
}

impl Default for ExtraCollectionPolicy {
    fn default() -> Self {
        Self {
            threshold_kg: DEFAULT_EXTRA_COLLECTION_THRESHOLD_KG,
        }
    }
}

impl ExtraCollectionPolicy {
    pub fn new(threshold_kg: f64) -> Result<Self> {
        if !threshold_kg.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "Threshold must be a finite number of kilograms, got {}",
                threshold_kg
            )));
        }

        Ok(Self { threshold_kg })
    }

    pub fn threshold_kg(&self) -> f64 {
        self.threshold_kg
    }

    /// True only when the prediction is strictly above the threshold
    pub fn recommends_extra(&self, predicted_kg: f64) -> bool {
        predicted_kg > self.threshold_kg
    }
}

/// Apply the default 700 kg rule
pub fn recommend(predicted_kg: f64) -> bool {
    ExtraCollectionPolicy::default().recommends_extra(predicted_kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_not_recommended() {
        assert!(!recommend(700.0));
        assert!(recommend(700.000_001));
        assert!(!recommend(-5.0));
        assert!(!recommend(f64::NAN));
    }

    #[test]
    fn test_custom_threshold() {
        let policy = ExtraCollectionPolicy::new(500.0).unwrap();
        assert!(policy.recommends_extra(500.5));
        assert!(!policy.recommends_extra(500.0));
        assert!(ExtraCollectionPolicy::new(f64::INFINITY).is_err());
    }
}
