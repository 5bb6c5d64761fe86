//! Writing predictions out as CSV or JSON

use crate::data::{Dataset, DATE_FORMAT};
use crate::error::Result;
use crate::prediction::Prediction;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct PredictionRow<'a> {
    zone: &'a str,
    date: String,
    weekday: String,
    predicted_kg: f64,
    extra_collection: &'static str,
}

impl<'a> From<&'a Prediction> for PredictionRow<'a> {
    fn from(prediction: &'a Prediction) -> Self {
        Self {
            zone: &prediction.zone,
            date: prediction.date.format("%Y-%m-%d").to_string(),
            weekday: prediction.date.format("%A").to_string(),
            predicted_kg: prediction.predicted_kg.round(),
            extra_collection: if prediction.extra_collection_recommended {
                "yes"
            } else {
                "no"
            },
        }
    }
}

/// Write predictions as CSV, one row per zone and day, masses rounded to whole kilograms
pub fn write_predictions_csv<W: Write>(writer: W, predictions: &[Prediction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for prediction in predictions {
        csv_writer.serialize(PredictionRow::from(prediction))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write predictions as a pretty-printed JSON array, masses unrounded
pub fn write_predictions_json<W: Write>(mut writer: W, predictions: &[Prediction]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, predictions)?;
    writer.flush()?;
    Ok(())
}

/// Write collection history in the layout [`DataLoader`](crate::data::DataLoader) reads back
pub fn write_history_csv<W: Write>(writer: W, dataset: &Dataset) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["date", "zone", "quantity", "zone_category", "rain", "holiday"])?;
    for record in dataset.records() {
        csv_writer.write_record([
            record.date.format(DATE_FORMAT).to_string(),
            record.zone.clone(),
            record.quantity_kg.to_string(),
            record.zone_category.clone(),
            u8::from(record.rained).to_string(),
            u8::from(record.is_holiday).to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
