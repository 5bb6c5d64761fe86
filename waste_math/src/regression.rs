//! Ordinary least squares regression
//!
//! Fits `y = intercept + X * coefficients` without scaling or regularization.
//! The intercept is handled by centering the design matrix and the response,
//! then the centered system is solved through a singular value decomposition.
//! Rank deficient designs (a column that never varies, two columns that move
//! together) resolve to the minimum norm solution instead of failing.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Least squares solver
#[derive(Debug, Clone, Default)]
pub struct LeastSquares {
    /// Singular values at or below this cutoff are treated as zero.
    /// When unset the cutoff is `max(n, k) * eps * largest_singular_value`.
    tolerance: Option<f64>,
}

/// Coefficients of a fitted linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// One weight per feature, in column order
    pub coefficients: Vec<f64>,
    /// Intercept term
    pub intercept: f64,
    /// Numerical rank of the centered design matrix
    pub rank: usize,
}

impl LeastSquares {
    /// Create a solver with the default singular value cutoff
    pub fn new() -> Self {
        Self { tolerance: None }
    }

    /// Create a solver with an explicit singular value cutoff
    pub fn with_tolerance(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(MathError::InvalidInput(
                "Tolerance must be a finite, non-negative number".to_string(),
            ));
        }

        Ok(Self {
            tolerance: Some(tolerance),
        })
    }

    /// Fit the model to `rows` (one feature slice per observation) and `targets`
    pub fn fit<R: AsRef<[f64]>>(&self, rows: &[R], targets: &[f64]) -> Result<LinearFit> {
        let n = rows.len();
        if n == 0 {
            return Err(MathError::InsufficientData(
                "At least one observation is required to fit a linear model".to_string(),
            ));
        }

        if targets.len() != n {
            return Err(MathError::DimensionMismatch {
                expected: n,
                got: targets.len(),
            });
        }

        let k = rows[0].as_ref().len();
        if k == 0 {
            return Err(MathError::InvalidInput(
                "Observations must carry at least one feature".to_string(),
            ));
        }

        for row in rows {
            let width = row.as_ref().len();
            if width != k {
                return Err(MathError::DimensionMismatch {
                    expected: k,
                    got: width,
                });
            }
        }

        let all_finite = rows
            .iter()
            .flat_map(|row| row.as_ref().iter())
            .chain(targets.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(MathError::InvalidInput(
                "Features and targets must be finite".to_string(),
            ));
        }

        let count = n as f64;
        let feature_means: Vec<f64> = (0..k)
            .map(|j| rows.iter().map(|row| row.as_ref()[j]).sum::<f64>() / count)
            .collect();
        let target_mean = targets.iter().sum::<f64>() / count;

        let design = DMatrix::from_fn(n, k, |i, j| rows[i].as_ref()[j] - feature_means[j]);
        let response = DVector::from_iterator(n, targets.iter().map(|y| y - target_mean));

        let svd = design.svd(true, true);
        let cutoff = match self.tolerance {
            Some(tolerance) => tolerance,
            None => svd.singular_values.max() * n.max(k) as f64 * f64::EPSILON,
        };
        let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();

        let weights = svd
            .solve(&response, cutoff)
            .map_err(|e| MathError::CalculationError(e.to_string()))?;

        let coefficients: Vec<f64> = weights.iter().copied().collect();
        let intercept = target_mean
            - coefficients
                .iter()
                .zip(feature_means.iter())
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(LinearFit {
            coefficients,
            intercept,
            rank,
        })
    }
}

impl LinearFit {
    /// Apply the fitted linear map to one observation
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(MathError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }

    /// Apply the fitted linear map to every observation, keeping input order
    pub fn predict_many<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row.as_ref())).collect()
    }
}
