//! # Waste Math
//!
//! Numerical building blocks for the waste forecasting engine.
//! This crate provides an ordinary least squares solver, a reproducible
//! shuffled train/test split and the regression metrics used to score a fit.

use thiserror::Error;

pub mod metrics;
pub mod regression;
pub mod split;

pub use metrics::{mean_absolute_error, mean_squared_error, r_squared};
pub use regression::{LeastSquares, LinearFit};
pub use split::{train_test_split, SplitIndices};

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
