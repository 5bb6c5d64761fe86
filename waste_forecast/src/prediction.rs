//! Forecast requests and their per-day results

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Predicted collection for one zone on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub zone: String,
    pub date: NaiveDate,
    /// Raw regression output; not clamped, so it can be negative
    pub predicted_kg: f64,
    pub extra_collection_recommended: bool,
}

/// A ranged forecast for one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub zone: String,
    /// First forecast day
    pub start: NaiveDate,
    /// First day after the forecast
    pub end: NaiveDate,
    pub rained: bool,
    pub is_holiday: bool,
}

impl ForecastRequest {
    /// Dry, non-holiday forecast for `zone` over `[start, end)`
    pub fn new(zone: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            zone: zone.into(),
            start,
            end,
            rained: false,
            is_holiday: false,
        }
    }

    pub fn with_rain(mut self, rained: bool) -> Self {
        self.rained = rained;
        self
    }

    pub fn with_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = is_holiday;
        self
    }

    /// Days covered by the request
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        forecast_dates(self.start, self.end)
    }
}

/// Consecutive days from `start` up to, but not including, `end`
pub fn forecast_dates(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    if end <= start {
        return Err(ForecastError::InvalidRange { start, end });
    }

    let days = (end - start).num_days();
    Ok((0..days).map(|offset| start + Duration::days(offset)).collect())
}
