//! Historical collection data and the CSV loader that produces it

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Date format used by the collection spreadsheets
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const DATE_ALIASES: &[&str] = &["date", "data"];
const ZONE_ALIASES: &[&str] = &["zone", "area", "bairro"];
const QUANTITY_ALIASES: &[&str] = &["quantity", "quantity_kg", "quantidade", "quantidade_lixo"];
const CATEGORY_ALIASES: &[&str] = &["zone_category", "category", "tipo_area"];
const RAIN_ALIASES: &[&str] = &["rain", "rained", "chuva"];
const HOLIDAY_ALIASES: &[&str] = &["holiday", "is_holiday", "feriado"];

/// One observed day of collection in one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Collection date
    pub date: NaiveDate,
    /// Name of the collection zone
    pub zone: String,
    /// Static category of the zone
    pub zone_category: String,
    /// Whether it rained that day
    pub rained: bool,
    /// Whether the day was a holiday
    pub is_holiday: bool,
    /// Collected waste mass in kilograms
    pub quantity_kg: f64,
}

impl HistoricalRecord {
    /// Create a record for a dry working day
    pub fn new(
        date: NaiveDate,
        zone: impl Into<String>,
        zone_category: impl Into<String>,
        quantity_kg: f64,
    ) -> Self {
        Self {
            date,
            zone: zone.into(),
            zone_category: zone_category.into(),
            rained: false,
            is_holiday: false,
            quantity_kg,
        }
    }

    /// Set the rain flag
    pub fn with_rain(mut self, rained: bool) -> Self {
        self.rained = rained;
        self
    }

    /// Set the holiday flag
    pub fn with_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = is_holiday;
        self
    }
}

/// Historical averages for one zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone: String,
    pub zone_category: String,
    pub record_count: usize,
    pub mean_kg: f64,
    pub min_kg: f64,
    pub max_kg: f64,
}

/// Validated collection of historical records
///
/// Every zone maps to exactly one category and every quantity is a finite,
/// non-negative number.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<HistoricalRecord>,
    /// Zones in the order they first appear
    zones: Vec<String>,
    zone_categories: HashMap<String, String>,
}

impl Dataset {
    /// Build a dataset, checking the per-record and per-zone invariants
    pub fn new(records: Vec<HistoricalRecord>) -> Result<Self> {
        let mut zones = Vec::new();
        let mut zone_categories: HashMap<String, String> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            if !record.quantity_kg.is_finite() || record.quantity_kg < 0.0 {
                return Err(ForecastError::InvalidQuantity {
                    index,
                    quantity_kg: record.quantity_kg,
                });
            }

            match zone_categories.get(&record.zone) {
                Some(known) if known != &record.zone_category => {
                    return Err(ForecastError::ConflictingZoneCategory {
                        zone: record.zone.clone(),
                        first: known.clone(),
                        second: record.zone_category.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    zones.push(record.zone.clone());
                    zone_categories.insert(record.zone.clone(), record.zone_category.clone());
                }
            }
        }

        debug!(
            records = records.len(),
            zones = zones.len(),
            "dataset validated"
        );

        Ok(Self {
            records,
            zones,
            zone_categories,
        })
    }

    /// All records, in input order
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct zones in first-seen order
    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    /// Category of a zone, if the zone is present
    pub fn category_of(&self, zone: &str) -> Option<&str> {
        self.zone_categories.get(zone).map(String::as_str)
    }

    /// Distinct zone categories
    pub fn categories(&self) -> BTreeSet<&str> {
        self.zone_categories.values().map(String::as_str).collect()
    }

    /// Mean, minimum and maximum collected mass for every zone
    pub fn zone_summaries(&self) -> Vec<ZoneSummary> {
        self.zones
            .iter()
            .map(|zone| {
                let quantities: Vec<f64> = self
                    .records
                    .iter()
                    .filter(|r| &r.zone == zone)
                    .map(|r| r.quantity_kg)
                    .collect();

                ZoneSummary {
                    zone: zone.clone(),
                    zone_category: self.zone_categories[zone].clone(),
                    record_count: quantities.len(),
                    mean_kg: quantities.iter().mean(),
                    min_kg: Statistics::min(quantities.iter()),
                    max_kg: Statistics::max(quantities.iter()),
                }
            })
            .collect()
    }
}

/// Column positions of the fields the loader needs
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnLayout {
    date: usize,
    zone: usize,
    quantity: usize,
    category: usize,
    rain: Option<usize>,
    holiday: Option<usize>,
}

impl ColumnLayout {
    /// Layout of header-less exports: date, zone, quantity, category
    fn headerless() -> Self {
        Self {
            date: 0,
            zone: 1,
            quantity: 2,
            category: 3,
            rain: None,
            holiday: None,
        }
    }

    fn from_header(header: &StringRecord) -> Result<Self> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));
        let require = |aliases: &[&str]| {
            find(aliases).ok_or_else(|| ForecastError::MissingColumn(aliases[0].to_string()))
        };

        Ok(Self {
            date: require(DATE_ALIASES)?,
            zone: require(ZONE_ALIASES)?,
            quantity: require(QUANTITY_ALIASES)?,
            category: require(CATEGORY_ALIASES)?,
            rain: find(RAIN_ALIASES),
            holiday: find(HOLIDAY_ALIASES),
        })
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<HistoricalRecord> {
        let raw_date = required_field(record, self.date, "date", line)?;
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
            ForecastError::DateParse {
                line,
                value: raw_date.to_string(),
            }
        })?;

        let raw_quantity = required_field(record, self.quantity, "quantity", line)?;
        let quantity_kg: f64 = raw_quantity
            .parse()
            .map_err(|_| ForecastError::InvalidRecord {
                line,
                reason: format!("quantity '{}' is not a number", raw_quantity),
            })?;
        if !quantity_kg.is_finite() || quantity_kg < 0.0 {
            return Err(ForecastError::InvalidRecord {
                line,
                reason: format!("quantity must be non-negative, got {}", raw_quantity),
            });
        }

        let flag = |index: Option<usize>, name: &str| -> Result<bool> {
            let raw = index.and_then(|i| record.get(i)).unwrap_or("");
            parse_flag(raw).ok_or_else(|| ForecastError::InvalidRecord {
                line,
                reason: format!("{} flag '{}' is not a yes/no value", name, raw),
            })
        };

        Ok(HistoricalRecord {
            date,
            zone: required_field(record, self.zone, "zone", line)?.to_string(),
            zone_category: required_field(record, self.category, "zone category", line)?
                .to_string(),
            rained: flag(self.rain, "rain")?,
            is_holiday: flag(self.holiday, "holiday")?,
            quantity_kg,
        })
    }
}

fn required_field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ForecastError::InvalidRecord {
            line,
            reason: format!("missing {}", name),
        }),
    }
}

/// Three slash-separated groups of digits. Out-of-range values such as
/// `32/01/2025` still count, so they fail as dates rather than as a header.
fn has_date_shape(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Interpret a rain/holiday cell. Empty cells mean "no".
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" | "0" | "0.0" | "false" | "no" | "n" | "não" | "nao" => Some(false),
        "1" | "1.0" | "true" | "yes" | "y" | "sim" | "s" => Some(true),
        _ => None,
    }
}

/// Loader for historical collection spreadsheets
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load historical data from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            records = dataset.len(),
            zones = dataset.zones().len(),
            "loaded collection history"
        );

        Ok(dataset)
    }

    /// Load historical data from any CSV source
    ///
    /// A first row that starts with a `DD/MM/YYYY`-shaped value is treated as data and
    /// the columns are read as date, zone, quantity, category. Otherwise the
    /// first row is a header and columns are matched by name.
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = csv_reader.records();

        let first = match rows.next() {
            Some(row) => row?,
            None => return Dataset::new(Vec::new()),
        };

        let starts_with_date = first.get(0).map(has_date_shape).unwrap_or(false);

        let (layout, pending) = if starts_with_date {
            debug!("no header row found, using positional columns");
            (ColumnLayout::headerless(), Some(first))
        } else {
            (ColumnLayout::from_header(&first)?, None)
        };

        let mut records = Vec::new();
        for row in pending.into_iter().map(Ok::<_, csv::Error>).chain(rows) {
            let row = row?;
            if row.iter().all(str::is_empty) {
                continue;
            }
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            records.push(layout.parse(&row, line)?);
        }

        Dataset::new(records)
    }
}
