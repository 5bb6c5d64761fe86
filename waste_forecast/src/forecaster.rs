//! The forecaster: a model that is either unfit or fit, plus the
//! recommendation rule applied to everything it predicts.

use crate::config::ForecastConfig;
use crate::data::Dataset;
use crate::encoding::{encode, encode_query, CategoryEncoding, EncodedFeatureVector};
use crate::error::{ForecastError, Result};
use crate::models::linear::LinearRegressionModel;
use crate::models::{ForecastModel, TrainedForecastModel, TrainingExample};
use crate::prediction::{ForecastRequest, Prediction};
use crate::recommendation::ExtraCollectionPolicy;
use chrono::{Days, NaiveDate};
use tracing::{debug, info};

/// Days covered by a weekly outlook
pub const OUTLOOK_DAYS: u64 = 7;

/// Model plus recommendation rule
///
/// Starts unfit. `predict` and `recommend` fail with
/// [`ForecastError::ModelNotFit`] until `fit` succeeds. A later `fit`
/// replaces the trained model wholesale; a failed `fit` keeps the previous one.
#[derive(Debug)]
pub struct Forecaster<M: ForecastModel = LinearRegressionModel> {
    model: M,
    policy: ExtraCollectionPolicy,
    trained: Option<M::Trained>,
}

impl Forecaster<LinearRegressionModel> {
    /// Unfit linear forecaster built from settings
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        let model = LinearRegressionModel::from_config(config)?;
        let policy = ExtraCollectionPolicy::new(config.extra_collection_threshold_kg)?;
        Ok(Self::with_model(model, policy))
    }
}

impl Default for Forecaster<LinearRegressionModel> {
    fn default() -> Self {
        Self::with_model(LinearRegressionModel::default(), ExtraCollectionPolicy::default())
    }
}

impl<M: ForecastModel> Forecaster<M> {
    /// Unfit forecaster around any model
    pub fn with_model(model: M, policy: ExtraCollectionPolicy) -> Self {
        Self {
            model,
            policy,
            trained: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn policy(&self) -> ExtraCollectionPolicy {
        self.policy
    }

    pub fn is_fit(&self) -> bool {
        self.trained.is_some()
    }

    /// The trained model, if `fit` has succeeded
    pub fn trained(&self) -> Result<&M::Trained> {
        self.trained.as_ref().ok_or(ForecastError::ModelNotFit)
    }

    /// Fit on encoded examples, replacing any previous fit
    pub fn fit(&mut self, examples: &[TrainingExample]) -> Result<&M::Trained> {
        let trained = self.model.train(examples)?;
        Ok(&*self.trained.insert(trained))
    }

    /// Fit on historical records
    ///
    /// Fits the category encoding over the dataset's categories, encodes every
    /// record with it and fits the model. The encoding is returned so callers
    /// can encode their queries with exactly the same mapping.
    pub fn fit_dataset(&mut self, dataset: &Dataset) -> Result<CategoryEncoding> {
        let encoding = CategoryEncoding::fit(dataset.categories());
        let examples = dataset
            .records()
            .iter()
            .map(|record| Ok((encode(record, &encoding)?, record.quantity_kg)))
            .collect::<Result<Vec<TrainingExample>>>()?;

        debug!(
            categories = encoding.len(),
            rows = examples.len(),
            "encoded training data"
        );

        self.fit(&examples)?;
        Ok(encoding)
    }

    /// Predicted mass for each vector, in input order
    pub fn predict(&self, vectors: &[EncodedFeatureVector]) -> Result<Vec<f64>> {
        self.trained()?.predict(vectors)
    }

    /// Whether a predicted mass calls for an extra collection
    pub fn recommend(&self, predicted_kg: f64) -> Result<bool> {
        self.trained()?;
        Ok(self.policy.recommends_extra(predicted_kg))
    }

    /// Day-by-day forecast for one zone
    pub fn forecast_zone(
        &self,
        encoding: &CategoryEncoding,
        dataset: &Dataset,
        request: &ForecastRequest,
    ) -> Result<Vec<Prediction>> {
        let dates = request.dates()?;
        let category = dataset
            .category_of(&request.zone)
            .ok_or_else(|| ForecastError::UnknownZone(request.zone.clone()))?;

        let vectors = dates
            .iter()
            .map(|&date| {
                encode_query(
                    date,
                    category,
                    request.rained,
                    request.is_holiday,
                    encoding,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let predicted = self.predict(&vectors)?;

        Ok(dates
            .into_iter()
            .zip(predicted)
            .map(|(date, predicted_kg)| Prediction {
                zone: request.zone.clone(),
                date,
                predicted_kg,
                extra_collection_recommended: self.policy.recommends_extra(predicted_kg),
            })
            .collect())
    }

    /// Seven-day forecast for every zone in the dataset, zones in first-seen order
    pub fn weekly_outlook(
        &self,
        encoding: &CategoryEncoding,
        dataset: &Dataset,
        start: NaiveDate,
        rained: bool,
        is_holiday: bool,
    ) -> Result<Vec<Prediction>> {
        self.trained()?;
        let end = start
            .checked_add_days(Days::new(OUTLOOK_DAYS))
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "a {}-day outlook from {} runs past the last representable date",
                    OUTLOOK_DAYS, start
                ))
            })?;

        let mut predictions = Vec::with_capacity(dataset.zones().len() * OUTLOOK_DAYS as usize);
        for zone in dataset.zones() {
            let request = ForecastRequest::new(zone.clone(), start, end)
                .with_rain(rained)
                .with_holiday(is_holiday);
            predictions.extend(self.forecast_zone(encoding, dataset, &request)?);
        }

        info!(
            zones = dataset.zones().len(),
            flagged = predictions
                .iter()
                .filter(|p| p.extra_collection_recommended)
                .count(),
            "built weekly outlook"
        );

        Ok(predictions)
    }
}
