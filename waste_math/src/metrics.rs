//! Regression metrics for scoring a fitted model on held-out data

use crate::{MathError, Result};
use statrs::statistics::Statistics;

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Metrics need at least one observation".to_string(),
        ));
    }

    if actual.len() != predicted.len() {
        return Err(MathError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    Ok(())
}

/// Mean squared error between actual and predicted values
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean absolute error between actual and predicted values
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Coefficient of determination (R²)
///
/// Needs at least two observations. When the actual values have no variance
/// the score is 1.0 for a perfect prediction and 0.0 otherwise.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    if actual.len() < 2 {
        return Err(MathError::InsufficientData(
            "R² is undefined for fewer than two observations".to_string(),
        ));
    }

    let mean = actual.iter().mean();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_regression_metrics() {
        let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

        assert_approx_eq!(mean_absolute_error(&actual, &predicted).unwrap(), 2.4, 1e-9);
        assert_approx_eq!(mean_squared_error(&actual, &predicted).unwrap(), 6.0, 1e-9);
        // ss_tot = 1000, ss_res = 30
        assert_approx_eq!(r_squared(&actual, &predicted).unwrap(), 0.97, 1e-9);
    }

    #[test]
    fn test_perfect_and_constant_predictions() {
        let actual = vec![1.0, 2.0, 3.0];
        assert_approx_eq!(r_squared(&actual, &actual).unwrap(), 1.0);

        let flat = vec![2.0, 2.0, 2.0];
        assert_approx_eq!(r_squared(&actual, &flat).unwrap(), 0.0);

        assert_eq!(r_squared(&flat, &flat).unwrap(), 1.0);
        assert_eq!(r_squared(&flat, &actual).unwrap(), 0.0);
    }

    #[test]
    fn test_r_squared_can_be_negative() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![3.0, 2.0, 1.0];
        assert_approx_eq!(r_squared(&actual, &predicted).unwrap(), -3.0);
    }

    #[test]
    fn test_error_handling() {
        let empty: Vec<f64> = vec![];
        assert!(mean_squared_error(&empty, &empty).is_err());
        assert!(mean_absolute_error(&[1.0, 2.0], &[1.0]).is_err());
        assert!(matches!(
            r_squared(&[1.0], &[1.0]),
            Err(MathError::InsufficientData(_))
        ));
    }
}
