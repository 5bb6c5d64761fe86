//! Reproducible shuffled train/test split
//!
//! Row indices are shuffled with a ChaCha8 generator seeded from a fixed value,
//! so the same row count and seed always produce the same partition on every
//! platform. The held-out share is `ceil(test_ratio * n)` rows.

use crate::{MathError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices assigned to each side of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Indices used for fitting
    pub train: Vec<usize>,
    /// Indices held out for evaluation
    pub test: Vec<usize>,
}

/// Split `n` rows into shuffled train and test index sets
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Test ratio must be between 0 and 1, got {}",
            test_ratio
        )));
    }

    let test_size = (test_ratio * n as f64).ceil() as usize;
    if test_size >= n {
        return Err(MathError::InsufficientData(format!(
            "Cannot split {} rows with test ratio {}: no rows left for training",
            n, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size);

    Ok(SplitIndices {
        train,
        test: indices,
    })
}
