use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use waste_forecast::export::{write_history_csv, write_predictions_csv, write_predictions_json};
use waste_forecast::{
    DataLoader, Dataset, ForecastConfig, ForecastRequest, Forecaster, Prediction,
    SyntheticDataset, TrainedForecastModel,
};

#[derive(Parser)]
#[command(name = "waste-forecast")]
#[command(about = "Daily waste collection forecasts per zone", long_about = None)]
struct Cli {
    /// TOML file with forecast settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the extra collection threshold in kg
    #[arg(long, global = true)]
    threshold: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model and print its coefficients and held-out scores
    Train {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Forecast one zone over a date range (end date excluded)
    Forecast {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        zone: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        rain: bool,
        #[arg(long)]
        holiday: bool,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Forecast the next seven days for every zone
    Outlook {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        rain: bool,
        #[arg(long)]
        holiday: bool,
    },
    /// Print historical averages per zone
    Summary {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Write a synthetic collection history
    Generate {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "2025-01-06")]
        start: NaiveDate,
        #[arg(long, default_value_t = 90)]
        days: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("waste_forecast=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ForecastConfig> {
    let mut config = ForecastConfig::load(cli.config.as_deref())
        .context("failed to load forecast configuration")?;
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold(threshold);
        config.validate()?;
    }
    Ok(config)
}

fn load_dataset(csv: &Path) -> anyhow::Result<Dataset> {
    DataLoader::from_csv(csv).with_context(|| format!("failed to load {}", csv.display()))
}

fn print_predictions(predictions: &[Prediction]) {
    for prediction in predictions {
        println!(
            "- {} {} ({}): {:.0} kg{}",
            prediction.zone,
            prediction.date,
            prediction.date.format("%A"),
            prediction.predicted_kg,
            if prediction.extra_collection_recommended {
                "  -> schedule extra collection"
            } else {
                ""
            }
        );
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Train { csv } => {
            let dataset = load_dataset(csv)?;
            let mut forecaster = Forecaster::new(&config)?;
            let encoding = forecaster.fit_dataset(&dataset)?;
            let trained = forecaster.trained()?;

            println!("{}", trained.name());
            println!("Category codes:");
            for (label, code) in encoding.iter() {
                println!("  {} = {}", label, code);
            }
            println!("Intercept: {:.4}", trained.intercept());
            for (name, weight) in waste_forecast::encoding::FEATURE_NAMES
                .iter()
                .zip(trained.coefficients())
            {
                println!("  {:<20} {:.4}", name, weight);
            }
            print!("{}", trained.evaluation());
        }
        Commands::Forecast {
            csv,
            zone,
            start,
            end,
            rain,
            holiday,
            out,
            format,
        } => {
            let dataset = load_dataset(csv)?;
            let mut forecaster = Forecaster::new(&config)?;
            let encoding = forecaster.fit_dataset(&dataset)?;

            let request = ForecastRequest::new(zone.clone(), *start, *end)
                .with_rain(*rain)
                .with_holiday(*holiday);
            let predictions = forecaster.forecast_zone(&encoding, &dataset, &request)?;

            match out {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    let writer = BufWriter::new(file);
                    match format {
                        OutputFormat::Csv => write_predictions_csv(writer, &predictions)?,
                        OutputFormat::Json => write_predictions_json(writer, &predictions)?,
                    }
                    println!(
                        "Wrote {} predictions to {}.",
                        predictions.len(),
                        path.display()
                    );
                }
                None => {
                    println!("Forecast for {} ({} to {}):", zone, start, end);
                    print_predictions(&predictions);
                }
            }
        }
        Commands::Outlook {
            csv,
            start,
            rain,
            holiday,
        } => {
            let dataset = load_dataset(csv)?;
            let mut forecaster = Forecaster::new(&config)?;
            let encoding = forecaster.fit_dataset(&dataset)?;
            let predictions =
                forecaster.weekly_outlook(&encoding, &dataset, *start, *rain, *holiday)?;

            for zone in dataset.zones() {
                let category = dataset.category_of(zone).unwrap_or_default();
                println!("\nForecast for {} ({}):", zone, category);
                let for_zone: Vec<Prediction> = predictions
                    .iter()
                    .filter(|p| &p.zone == zone)
                    .cloned()
                    .collect();
                print_predictions(&for_zone);
            }
        }
        Commands::Summary { csv } => {
            let dataset = load_dataset(csv)?;
            let summaries = dataset.zone_summaries();
            if summaries.is_empty() {
                bail!("{} has no collection records", csv.display());
            }

            println!("Average collection per zone:");
            for summary in summaries {
                println!(
                    "- {} ({}): mean {:.1} kg, min {:.0}, max {:.0} across {} days",
                    summary.zone,
                    summary.zone_category,
                    summary.mean_kg,
                    summary.min_kg,
                    summary.max_kg,
                    summary.record_count
                );
            }
        }
        Commands::Generate {
            out,
            start,
            days,
            seed,
        } => {
            let dataset = SyntheticDataset::new(*start, *days)
                .with_seed(*seed)
                .generate()?;
            let file = File::create(out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            write_history_csv(BufWriter::new(file), &dataset)?;
            println!("Wrote {} records to {}.", dataset.len(), out.display());
        }
    }

    Ok(())
}
