use chrono::NaiveDate;
use std::io::{self, BufWriter, Write};
use waste_forecast::export::{write_history_csv, write_predictions_csv, write_predictions_json};
use waste_forecast::{Dataset, ForecastError, HistoricalRecord, Prediction};

/// Sink that rejects every write and flush
struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

fn create_predictions() -> Vec<Prediction> {
    let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    vec![
        Prediction {
            zone: "Centro".to_string(),
            date,
            predicted_kg: 731.6,
            extra_collection_recommended: true,
        },
        Prediction {
            zone: "Nova Betânia".to_string(),
            date,
            predicted_kg: 402.2,
            extra_collection_recommended: false,
        },
    ]
}

#[test]
fn test_buffered_json_write_failure_is_reported() {
    let result = write_predictions_json(BufWriter::new(BrokenSink), &create_predictions());
    assert!(matches!(result, Err(ForecastError::Io(_))));
}

#[test]
fn test_buffered_csv_write_failure_is_reported() {
    let result = write_predictions_csv(BufWriter::new(BrokenSink), &create_predictions());
    assert!(result.is_err());

    let dataset = Dataset::new(vec![HistoricalRecord::new(
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        "Centro",
        "comercial",
        650.0,
    )])
    .unwrap();
    assert!(write_history_csv(BufWriter::new(BrokenSink), &dataset).is_err());
}

#[test]
fn test_csv_rows() {
    let mut out = Vec::new();
    write_predictions_csv(&mut out, &create_predictions()).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "zone,date,weekday,predicted_kg,extra_collection",
            "Centro,2025-03-03,Monday,732.0,yes",
            "Nova Betânia,2025-03-03,Monday,402.0,no",
        ]
    );
}
