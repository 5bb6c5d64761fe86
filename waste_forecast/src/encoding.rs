//! Feature encoding for the regression
//!
//! A record becomes four numbers, in this order: day of week (Monday = 0),
//! zone category code, rain flag and holiday flag. Category codes come from a
//! [`CategoryEncoding`] fitted once over the training categories; the same
//! encoding must be used for every query made against the resulting model.

use crate::data::HistoricalRecord;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of features produced by the encoder
pub const FEATURE_COUNT: usize = 4;

/// Names of the encoded features, in column order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["day_of_week", "zone_category_code", "rain_flag", "holiday_flag"];

/// Mapping from zone category labels to integer codes
///
/// Labels are sorted lexicographically and each receives its rank, so the
/// same set of labels always yields the same codes regardless of the order
/// they were seen in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoding {
    codes: BTreeMap<String, u32>,
}

impl CategoryEncoding {
    /// Fit an encoding over a collection of category labels
    pub fn fit<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: BTreeMap<String, u32> = categories
            .into_iter()
            .map(|c| (c.as_ref().to_string(), 0))
            .collect();

        for (rank, code) in codes.values_mut().enumerate() {
            *code = rank as u32;
        }

        Self { codes }
    }

    /// Code for a category label
    pub fn code(&self, category: &str) -> Result<u32> {
        self.codes
            .get(category)
            .copied()
            .ok_or_else(|| ForecastError::UnknownCategory(category.to_string()))
    }

    /// Label for a code
    pub fn label(&self, code: u32) -> Option<&str> {
        self.codes
            .iter()
            .find(|(_, c)| **c == code)
            .map(|(label, _)| label.as_str())
    }

    /// Iterate over `(label, code)` pairs in code order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.codes.iter().map(|(label, &code)| (label.as_str(), code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Fit a [`CategoryEncoding`] over the distinct labels in `categories`
pub fn fit_category_encoding<I, S>(categories: I) -> CategoryEncoding
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CategoryEncoding::fit(categories)
}

/// Numeric features for one day in one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedFeatureVector {
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u32,
    pub zone_category_code: u32,
    pub rain_flag: u8,
    pub holiday_flag: u8,
}

impl EncodedFeatureVector {
    /// Features as regression inputs, in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.day_of_week),
            f64::from(self.zone_category_code),
            f64::from(self.rain_flag),
            f64::from(self.holiday_flag),
        ]
    }
}

/// Day of week with Monday = 0 and Sunday = 6
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Encode a historical record
pub fn encode(record: &HistoricalRecord, encoding: &CategoryEncoding) -> Result<EncodedFeatureVector> {
    encode_query(
        record.date,
        &record.zone_category,
        record.rained,
        record.is_holiday,
        encoding,
    )
}

/// Encode a day that has not been observed yet
pub fn encode_query(
    date: NaiveDate,
    zone_category: &str,
    rained: bool,
    is_holiday: bool,
    encoding: &CategoryEncoding,
) -> Result<EncodedFeatureVector> {
    Ok(EncodedFeatureVector {
        day_of_week: day_of_week(date),
        zone_category_code: encoding.code(zone_category)?,
        rain_flag: u8::from(rained),
        holiday_flag: u8::from(is_holiday),
    })
}
