use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use waste_forecast::data::{Dataset, HistoricalRecord};
use waste_forecast::encoding::{encode_query, CategoryEncoding, EncodedFeatureVector};
use waste_forecast::error::ForecastError;
use waste_forecast::forecaster::Forecaster;
use waste_forecast::prediction::{forecast_dates, ForecastRequest};
use waste_forecast::shared::SharedForecaster;
use waste_forecast::{ForecastConfig, SyntheticDataset};

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// Two weeks of history for two zones
fn create_dataset() -> Dataset {
    let mut records = Vec::new();
    for offset in 0..14 {
        let date = day(1, 6) + Duration::days(offset);
        let weekday_effect = 20.0 * (offset % 7) as f64;
        records.push(
            HistoricalRecord::new(date, "Centro", "comercial", 640.0 + weekday_effect)
                .with_rain(offset % 4 == 0),
        );
        records.push(HistoricalRecord::new(
            date,
            "Nova Betânia",
            "residencial",
            390.0 + weekday_effect + (offset % 3) as f64 * 15.0,
        ));
    }
    Dataset::new(records).unwrap()
}

#[test]
fn test_unfit_forecaster_refuses_to_predict() {
    let forecaster: Forecaster = Forecaster::default();
    assert!(!forecaster.is_fit());

    let encoding = CategoryEncoding::fit(["comercial"]);
    let vector = encode_query(day(3, 3), "comercial", false, false, &encoding).unwrap();

    assert!(matches!(
        forecaster.predict(&[vector]),
        Err(ForecastError::ModelNotFit)
    ));
    assert!(matches!(
        forecaster.recommend(800.0),
        Err(ForecastError::ModelNotFit)
    ));
    assert!(matches!(forecaster.trained(), Err(ForecastError::ModelNotFit)));

    let dataset = create_dataset();
    let request = ForecastRequest::new("Centro", day(3, 3), day(3, 5));
    assert!(matches!(
        forecaster.forecast_zone(&encoding, &dataset, &request),
        Err(ForecastError::ModelNotFit)
    ));
    assert!(matches!(
        forecaster.weekly_outlook(&encoding, &Dataset::default(), day(3, 3), false, false),
        Err(ForecastError::ModelNotFit)
    ));
}

#[test]
fn test_fit_dataset_then_forecast_zone() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    assert!(forecaster.is_fit());
    assert_eq!(encoding.code("comercial").unwrap(), 0);
    assert_eq!(encoding.code("residencial").unwrap(), 1);

    let request = ForecastRequest::new("Centro", day(3, 3), day(3, 10)).with_rain(true);
    let predictions = forecaster.forecast_zone(&encoding, &dataset, &request).unwrap();

    assert_eq!(predictions.len(), 7);
    let dates: Vec<NaiveDate> = predictions.iter().map(|p| p.date).collect();
    assert_eq!(dates, forecast_dates(day(3, 3), day(3, 10)).unwrap());
    for prediction in &predictions {
        assert_eq!(prediction.zone, "Centro");
        assert!(prediction.predicted_kg.is_finite());
        assert_eq!(
            prediction.extra_collection_recommended,
            prediction.predicted_kg > 700.0
        );
        assert_eq!(
            forecaster.recommend(prediction.predicted_kg).unwrap(),
            prediction.extra_collection_recommended
        );
    }
}

#[test]
fn test_training_records_never_hit_unknown_category() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    let vectors = dataset
        .records()
        .iter()
        .map(|r| waste_forecast::encode(r, &encoding))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(forecaster.predict(&vectors).unwrap().len(), dataset.len());
}

#[test]
fn test_range_must_end_after_start() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    let request = ForecastRequest::new("Centro", day(3, 10), day(3, 10));
    match forecaster.forecast_zone(&encoding, &dataset, &request) {
        Err(ForecastError::InvalidRange { start, end }) => {
            assert_eq!(start, day(3, 10));
            assert_eq!(end, day(3, 10));
        }
        other => panic!("Expected InvalidRange, got {:?}", other),
    }

    let backwards = ForecastRequest::new("Centro", day(3, 10), day(3, 1));
    assert!(matches!(
        forecaster.forecast_zone(&encoding, &dataset, &backwards),
        Err(ForecastError::InvalidRange { .. })
    ));
}

#[test]
fn test_unknown_zone_and_category() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    let request = ForecastRequest::new("Abolição", day(3, 3), day(3, 4));
    assert!(matches!(
        forecaster.forecast_zone(&encoding, &dataset, &request),
        Err(ForecastError::UnknownZone(_))
    ));

    // A zone known to the dataset but whose category the encoding never saw
    let other = Dataset::new(vec![HistoricalRecord::new(
        day(1, 6),
        "Abolição",
        "misto",
        500.0,
    )])
    .unwrap();
    assert!(matches!(
        forecaster.forecast_zone(&encoding, &other, &request),
        Err(ForecastError::UnknownCategory(_))
    ));
}

#[test]
fn test_weekly_outlook_covers_every_zone() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    let predictions = forecaster
        .weekly_outlook(&encoding, &dataset, day(3, 3), false, false)
        .unwrap();

    assert_eq!(predictions.len(), 14);
    assert!(predictions[..7].iter().all(|p| p.zone == "Centro"));
    assert!(predictions[7..].iter().all(|p| p.zone == "Nova Betânia"));
    assert_eq!(predictions[0].date, day(3, 3));
    assert_eq!(predictions[6].date, day(3, 9));
}

#[test]
fn test_weekly_outlook_near_last_date() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    let result = forecaster.weekly_outlook(&encoding, &dataset, NaiveDate::MAX, false, false);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));

    let last_full_week = NaiveDate::MAX - Duration::days(7);
    let predictions = forecaster
        .weekly_outlook(&encoding, &dataset, last_full_week, false, false)
        .unwrap();
    assert_eq!(predictions.len(), 14);
}

#[test]
fn test_configured_threshold_drives_recommendation() {
    let dataset = create_dataset();
    let config = ForecastConfig::default().with_threshold(0.0);
    let mut forecaster = Forecaster::new(&config).unwrap();
    let encoding = forecaster.fit_dataset(&dataset).unwrap();

    let request = ForecastRequest::new("Centro", day(3, 3), day(3, 6));
    let predictions = forecaster.forecast_zone(&encoding, &dataset, &request).unwrap();
    assert!(predictions.iter().all(|p| p.extra_collection_recommended));

    assert!(Forecaster::new(&ForecastConfig::default().with_threshold(f64::NAN)).is_err());
}

#[test]
fn test_failed_fit_keeps_previous_model() {
    let dataset = create_dataset();
    let mut forecaster: Forecaster = Forecaster::default();
    forecaster.fit_dataset(&dataset).unwrap();
    let before = forecaster.trained().unwrap().coefficients().to_vec();

    let single = Dataset::new(dataset.records()[..1].to_vec()).unwrap();
    assert!(matches!(
        forecaster.fit_dataset(&single),
        Err(ForecastError::InsufficientData(_))
    ));

    assert!(forecaster.is_fit());
    assert_eq!(forecaster.trained().unwrap().coefficients(), &before[..]);
}

#[test]
fn test_shared_forecaster_publishes_refits() {
    let shared: SharedForecaster = SharedForecaster::new(Forecaster::default());
    let vector = EncodedFeatureVector {
        day_of_week: 2,
        zone_category_code: 0,
        rain_flag: 0,
        holiday_flag: 0,
    };
    assert!(matches!(
        shared.predict(&[vector]),
        Err(ForecastError::ModelNotFit)
    ));

    let first_data = create_dataset();
    shared.refit_dataset(&first_data).unwrap();
    let old = shared.snapshot();
    let old_prediction = old.predict(&[vector]).unwrap();

    let second_data = SyntheticDataset::new(day(1, 6), 28)
        .with_zones([("Centro", "comercial", 900.0), ("Nova Betânia", "residencial", 200.0)])
        .generate()
        .unwrap();
    shared.refit_dataset(&second_data).unwrap();

    // Snapshots taken before the refit keep the coefficients they were fitted with
    assert_eq!(old.predict(&[vector]).unwrap(), old_prediction);
    assert_ne!(
        shared.snapshot().trained().unwrap().coefficients(),
        old.trained().unwrap().coefficients()
    );
    assert_eq!(
        shared.predict(&[vector]).unwrap(),
        shared.snapshot().predict(&[vector]).unwrap()
    );
}

#[test]
fn test_shared_forecaster_concurrent_readers() {
    let dataset = create_dataset();
    let shared: Arc<SharedForecaster> = Arc::new(SharedForecaster::new(Forecaster::default()));
    let encoding = shared.refit_dataset(&dataset).unwrap();
    let vector = encode_query(day(3, 3), "residencial", false, false, &encoding).unwrap();
    let expected = shared.predict(&[vector]).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                (0..50)
                    .map(|_| shared.predict(&[vector]).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for prediction in handle.join().unwrap() {
            assert_eq!(prediction, expected);
        }
    }
}

#[test]
fn test_failed_refit_keeps_published_model() {
    let dataset = create_dataset();
    let shared: SharedForecaster = SharedForecaster::new(Forecaster::default());
    shared.refit_dataset(&dataset).unwrap();
    let before = shared.snapshot();

    assert!(shared.refit(&[]).is_err());
    assert!(Arc::ptr_eq(&before, &shared.snapshot()));
}
