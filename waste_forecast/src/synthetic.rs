//! Reproducible synthetic collection history for demos and tests

use crate::data::{Dataset, HistoricalRecord};
use crate::encoding::day_of_week;
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Weekday adjustment in kg, Monday first
const WEEKDAY_EFFECT_KG: [f64; 7] = [90.0, 40.0, 20.0, 10.0, 60.0, 120.0, -80.0];
const RAIN_EFFECT_KG: f64 = 75.0;
const HOLIDAY_EFFECT_KG: f64 = -110.0;

/// Generator for a dataset with weekday, category, rain and holiday effects
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// `(zone, category, base kg)` triples
    zones: Vec<(String, String, f64)>,
    start: NaiveDate,
    days: usize,
    seed: u64,
    rain_probability: f64,
    holiday_probability: f64,
    noise_std_kg: f64,
}

impl SyntheticDataset {
    /// Four Mossoró zones over `days` days from `start`
    pub fn new(start: NaiveDate, days: usize) -> Self {
        let zones = [
            ("Centro", "comercial", 620.0),
            ("Nova Betânia", "residencial", 430.0),
            ("Alto de São Manoel", "residencial", 380.0),
            ("Abolição", "misto", 500.0),
        ]
        .into_iter()
        .map(|(zone, category, base)| (zone.to_string(), category.to_string(), base))
        .collect();

        Self {
            zones,
            start,
            days,
            seed: 42,
            rain_probability: 0.2,
            holiday_probability: 0.05,
            noise_std_kg: 35.0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the zone list with `(zone, category, base kg)` triples
    pub fn with_zones<I, Z, C>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = (Z, C, f64)>,
        Z: Into<String>,
        C: Into<String>,
    {
        self.zones = zones
            .into_iter()
            .map(|(zone, category, base)| (zone.into(), category.into(), base))
            .collect();
        self
    }

    pub fn with_probabilities(mut self, rain: f64, holiday: f64) -> Self {
        self.rain_probability = rain;
        self.holiday_probability = holiday;
        self
    }

    pub fn with_noise(mut self, std_kg: f64) -> Self {
        self.noise_std_kg = std_kg;
        self
    }

    /// Build the dataset. Rain and holidays are drawn once per day and apply to every zone.
    pub fn generate(&self) -> Result<Dataset> {
        for (name, p) in [
            ("rain", self.rain_probability),
            ("holiday", self.holiday_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} probability must be between 0 and 1, got {}",
                    name, p
                )));
            }
        }

        if !(self.noise_std_kg.is_finite() && self.noise_std_kg >= 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "noise standard deviation must be a non-negative number of kg, got {}",
                self.noise_std_kg
            )));
        }

        let noise = Normal::new(0.0, self.noise_std_kg)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut records = Vec::with_capacity(self.days * self.zones.len());
        for offset in 0..self.days {
            let date = self
                .start
                .checked_add_days(Days::new(offset as u64))
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "{} days from {} runs past the last representable date",
                        self.days, self.start
                    ))
                })?;
            let rained = rng.gen_bool(self.rain_probability);
            let is_holiday = rng.gen_bool(self.holiday_probability);

            for (zone, category, base) in &self.zones {
                let mut kg = base + WEEKDAY_EFFECT_KG[day_of_week(date) as usize];
                if rained {
                    kg += RAIN_EFFECT_KG;
                }
                if is_holiday {
                    kg += HOLIDAY_EFFECT_KG;
                }
                kg += noise.sample(&mut rng);

                records.push(
                    HistoricalRecord::new(date, zone.as_str(), category.as_str(), kg.max(0.0).round())
                        .with_rain(rained)
                        .with_holiday(is_holiday),
                );
            }
        }

        Dataset::new(records)
    }
}
