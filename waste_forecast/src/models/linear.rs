//! Linear regression over the encoded calendar and zone features

use crate::config::ForecastConfig;
use crate::encoding::{EncodedFeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ModelEvaluation, TrainedForecastModel, TrainingExample};
use serde::Serialize;
use tracing::{debug, info, warn};
use waste_math::{
    mean_absolute_error, mean_squared_error, r_squared, train_test_split, LeastSquares, LinearFit,
    MathError,
};

/// Ordinary least squares model with a seeded hold-out split
#[derive(Debug, Clone)]
pub struct LinearRegressionModel {
    /// Name of the model
    name: String,
    /// Share of rows held out for evaluation
    test_ratio: f64,
    /// Seed for the hold-out shuffle
    seed: u64,
    /// Fewest rows accepted by `train`
    min_training_rows: usize,
}

/// Trained linear regression model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedLinearModel {
    /// Name of the model
    name: String,
    /// Fitted weights and intercept
    fit: LinearFit,
    /// Scores on the held-out rows
    evaluation: ModelEvaluation,
}

impl LinearRegressionModel {
    /// Create a new linear regression model
    pub fn new(test_ratio: f64, seed: u64) -> Result<Self> {
        Self::from_config(&ForecastConfig {
            test_ratio,
            seed,
            ..ForecastConfig::default()
        })
    }

    /// Create a model from forecast settings
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &ForecastConfig) -> Self {
        Self {
            name: format!(
                "Linear Regression (test_ratio={}, seed={})",
                config.test_ratio, config.seed
            ),
            test_ratio: config.test_ratio,
            seed: config.seed,
            min_training_rows: config.min_training_rows,
        }
    }

    pub fn test_ratio(&self) -> f64 {
        self.test_ratio
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn check_targets(&self, examples: &[TrainingExample]) -> Result<()> {
        if examples.len() < self.min_training_rows {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least {} rows to fit, got {}",
                self.min_training_rows,
                examples.len()
            )));
        }

        if examples.iter().any(|(_, kg)| !kg.is_finite()) {
            return Err(ForecastError::InsufficientData(
                "Target values must be finite".to_string(),
            ));
        }

        let first = examples[0].1;
        if examples.iter().all(|(_, kg)| *kg == first) {
            return Err(ForecastError::InsufficientData(format!(
                "Every target value is {}; there is nothing to fit",
                first
            )));
        }

        Ok(())
    }
}

impl Default for LinearRegressionModel {
    fn default() -> Self {
        Self::from_valid_config(&ForecastConfig::default())
    }
}

impl ForecastModel for LinearRegressionModel {
    type Trained = TrainedLinearModel;

    fn train(&self, examples: &[TrainingExample]) -> Result<Self::Trained> {
        self.check_targets(examples)?;

        let split =
            train_test_split(examples.len(), self.test_ratio, self.seed).map_err(|e| match e {
                MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
                other => other.into(),
            })?;
        debug!(
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            seed = self.seed,
            "split training data"
        );

        let (train_rows, train_targets) = gather(examples, &split.train);
        let (test_rows, test_targets) = gather(examples, &split.test);

        let fit = LeastSquares::new().fit(&train_rows, &train_targets)?;
        debug!(
            coefficients = ?fit.coefficients,
            intercept = fit.intercept,
            rank = fit.rank,
            "fitted least squares"
        );

        let test_predictions = fit.predict_many(&test_rows)?;
        let held_out_r2 = if test_targets.len() >= 2 {
            Some(r_squared(&test_targets, &test_predictions)?)
        } else {
            warn!(
                test_rows = test_targets.len(),
                "too few held-out rows to compute R²"
            );
            None
        };

        let evaluation = ModelEvaluation {
            r_squared: held_out_r2,
            mean_squared_error: mean_squared_error(&test_targets, &test_predictions)?,
            mean_absolute_error: mean_absolute_error(&test_targets, &test_predictions)?,
            train_rows: train_rows.len(),
            test_rows: test_rows.len(),
        };

        info!(
            train_rows = evaluation.train_rows,
            test_rows = evaluation.test_rows,
            r_squared = ?evaluation.r_squared,
            mse = evaluation.mean_squared_error,
            "trained linear model"
        );

        Ok(TrainedLinearModel {
            name: self.name.clone(),
            fit,
            evaluation,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn gather(examples: &[TrainingExample], indices: &[usize]) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    indices
        .iter()
        .map(|&i| (examples[i].0.to_array(), examples[i].1))
        .unzip()
}

impl TrainedLinearModel {
    /// Weights in feature order: day of week, category code, rain, holiday
    pub fn coefficients(&self) -> &[f64] {
        &self.fit.coefficients
    }

    /// Weight of a named feature
    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|name| *name == feature)
            .map(|i| self.fit.coefficients[i])
    }

    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    /// Numerical rank of the centered training design
    pub fn rank(&self) -> usize {
        self.fit.rank
    }
}

impl TrainedForecastModel for TrainedLinearModel {
    fn predict(&self, vectors: &[EncodedFeatureVector]) -> Result<Vec<f64>> {
        vectors
            .iter()
            .map(|v| self.fit.predict(&v.to_array()).map_err(ForecastError::from))
            .collect()
    }

    fn evaluation(&self) -> &ModelEvaluation {
        &self.evaluation
    }

    fn name(&self) -> &str {
        &self.name
    }
}
