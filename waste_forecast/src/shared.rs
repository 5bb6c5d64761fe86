//! A forecaster that many threads can predict with while another re-fits it

use crate::data::Dataset;
use crate::encoding::{CategoryEncoding, EncodedFeatureVector};
use crate::error::Result;
use crate::forecaster::Forecaster;
use crate::models::linear::LinearRegressionModel;
use crate::models::{ForecastModel, TrainingExample};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

/// Shared handle to the current forecaster
///
/// Readers take an `Arc` snapshot and predict without holding any lock.
/// `refit` trains a replacement off to the side and swaps it in with a single
/// write, so a reader sees either the old coefficients or the new ones.
/// Only one refit runs at a time.
#[derive(Debug)]
pub struct SharedForecaster<M: ForecastModel = LinearRegressionModel> {
    current: RwLock<Arc<Forecaster<M>>>,
    refit_guard: Mutex<()>,
}

impl<M: ForecastModel> SharedForecaster<M> {
    pub fn new(forecaster: Forecaster<M>) -> Self {
        Self {
            current: RwLock::new(Arc::new(forecaster)),
            refit_guard: Mutex::new(()),
        }
    }

    /// The forecaster as of now
    pub fn snapshot(&self) -> Arc<Forecaster<M>> {
        // The lock only guards an Arc swap, so a poisoned lock still holds a whole value.
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn predict(&self, vectors: &[EncodedFeatureVector]) -> Result<Vec<f64>> {
        self.snapshot().predict(vectors)
    }

    /// Train a replacement on encoded examples and publish it
    pub fn refit(&self, examples: &[TrainingExample]) -> Result<()> {
        self.replace_with(|forecaster| forecaster.fit(examples).map(|_| ()))
    }

    /// Train a replacement on historical records and publish it
    pub fn refit_dataset(&self, dataset: &Dataset) -> Result<CategoryEncoding> {
        self.replace_with(|forecaster| forecaster.fit_dataset(dataset))
    }

    fn replace_with<T>(&self, train: impl FnOnce(&mut Forecaster<M>) -> Result<T>) -> Result<T> {
        let _guard = self.refit_guard.lock().unwrap_or_else(PoisonError::into_inner);

        let base = self.snapshot();
        let mut next = Forecaster::with_model(base.model().clone(), base.policy());
        let output = train(&mut next)?;

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        debug!("published refitted forecaster");

        Ok(output)
    }
}
