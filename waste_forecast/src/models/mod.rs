//! Forecasting models for encoded collection data

use crate::encoding::EncodedFeatureVector;
use crate::error::Result;
use serde::Serialize;
use std::fmt::{self, Debug};

/// One training row: encoded features and the observed mass in kilograms
pub type TrainingExample = (EncodedFeatureVector, f64);

/// Scores of a fitted model on its held-out rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEvaluation {
    /// Coefficient of determination; `None` when fewer than two rows were held out
    pub r_squared: Option<f64>,
    /// Mean Squared Error
    pub mean_squared_error: f64,
    /// Mean Absolute Error
    pub mean_absolute_error: f64,
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows held out for scoring
    pub test_rows: usize,
}

impl fmt::Display for ModelEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Evaluation:")?;
        match self.r_squared {
            Some(r2) => writeln!(f, "  R²:    {:.4}", r2)?,
            None => writeln!(f, "  R²:    n/a")?,
        }
        writeln!(f, "  MSE:   {:.4}", self.mean_squared_error)?;
        writeln!(f, "  MAE:   {:.4}", self.mean_absolute_error)?;
        writeln!(f, "  Rows:  {} train / {} test", self.train_rows, self.test_rows)?;
        Ok(())
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Predict the collected mass for each vector, keeping input order
    fn predict(&self, vectors: &[EncodedFeatureVector]) -> Result<Vec<f64>>;

    /// Held-out scores computed while training
    fn evaluation(&self) -> &ModelEvaluation;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on encoded examples
pub trait ForecastModel: Debug + Clone + Send + Sync {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on encoded examples
    fn train(&self, examples: &[TrainingExample]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod linear;
