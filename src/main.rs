//! apu-monitor - Air Production Unit data-quality, drift and trend CLI
//!
//! # Usage
//!
//! ```bash
//! # Score one snapshot
//! apu-monitor score --values TP2=8.1,TP3=9,Reservoirs=9,Oil_temperature=55
//!
//! # Replay an exported CSV into the persisted log, then report drift/health
//! apu-monitor replay --csv apu_export.csv --role ml_engineer
//!
//! # Trend report over a date window
//! apu-monitor trend --from 2024-03-01 --to 2024-03-07 --params TP2,Oil_temperature
//! ```
//!
//! # Environment Variables
//!
//! - `APU_CONFIG`: Path to a TOML config file (default: ./apu_monitor.toml)
//! - `APU_STORE`: Persisted prediction log (default: [storage].history_file)
//! - `RUST_LOG`: Logging level (default: info)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use apu_monitor::config::{self, MonitorConfig};
use apu_monitor::sensors;
use apu_monitor::{
    DiagnosticPipeline, JsonPredictionStore, OperationalMonitor, PredictionEvent, PredictionLog,
    RecordedOracle, Role, SensorValidator, TimeAnalysis, TrendAnalyzer, TrendOutcome, TrendQuery,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "apu-monitor")]
#[command(about = "APU predictive maintenance: data quality, drift and trend analysis")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (default: ./apu_monitor.toml)
    #[arg(long, global = true, env = "APU_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// Persisted prediction log (default: [storage].history_file)
    #[arg(long, env = "APU_STORE")]
    store: Option<PathBuf>,

    /// Audience for recommendations
    #[arg(long, default_value = "plant_manager")]
    role: Role,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Score one snapshot and print the quality report with per-sensor checks
    Score {
        /// Comma-separated NAME=VALUE readings, e.g. TP2=8.1,TP3=9
        #[arg(long)]
        values: String,

        #[arg(long, default_value = "plant_manager")]
        role: Role,
    },

    /// Replay a CSV export through the pipeline and report drift and health
    Replay {
        /// CSV with sensor columns plus prediction and probability
        #[arg(long)]
        csv: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Concept-drift report over the tail of the persisted log
    Drift {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// System health report over the tail of the persisted log
    Health {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Trend report over a window of the persisted log
    Trend {
        #[command(flatten)]
        store: StoreArgs,

        /// First day included (YYYY-MM-DD)
        #[arg(long = "from")]
        from: Option<NaiveDate>,

        /// Last day included (YYYY-MM-DD)
        #[arg(long = "to")]
        to: Option<NaiveDate>,

        /// Comma-separated parameters (default: every analog sensor)
        #[arg(long, value_delimiter = ',')]
        params: Vec<String>,

        /// Restrict to a time-of-day window on each day
        #[arg(long)]
        within_day: bool,

        /// Window start (HH:MM), used with --within-day
        #[arg(long, value_parser = parse_time)]
        start_time: Option<NaiveTime>,

        /// Window end (HH:MM), used with --within-day
        #[arg(long, value_parser = parse_time)]
        end_time: Option<NaiveTime>,
    },
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| format!("expected HH:MM, got '{raw}': {e}"))
}

// ============================================================================
// Helpers
// ============================================================================

/// `--params` as given, or every analog sensor when none were listed
fn trend_parameters(params: Vec<String>) -> Vec<String> {
    if params.is_empty() {
        sensors::analog_names().map(str::to_string).collect()
    } else {
        params
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<JsonPredictionStore> {
    let path = path.unwrap_or_else(|| config::current().storage.history_file.clone());
    JsonPredictionStore::open(&path)
        .with_context(|| format!("Failed to open prediction log {}", path.display()))
}

/// Monitor seeded with the most recent persisted records it can hold
fn seeded_monitor(store: &JsonPredictionStore) -> OperationalMonitor {
    let mut monitor = OperationalMonitor::new();
    let capacity = monitor.config().history_capacity;
    for record in store.tail(capacity) {
        monitor.log_prediction(&PredictionEvent::from(record));
    }
    info!(
        seeded = monitor.history().len(),
        persisted = store.len(),
        path = %store.path().display(),
        "Monitor seeded from persisted log"
    );
    monitor
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_score(values: &str, role: Role) -> Result<()> {
    let snapshot = sensors::parse_assignments(values).context("Invalid --values")?;
    let validator = SensorValidator::new();

    let checks: BTreeMap<&str, _> = snapshot
        .iter()
        .map(|(name, value)| {
            (name.as_str(), validator.validate_sensor_reading(name, *value, role))
        })
        .collect();
    let report = validator.generate_data_quality_report(&snapshot, role);

    print_json(&serde_json::json!({
        "report": report,
        "checks": checks,
        "active_signals": sensors::active_digital(&snapshot),
    }))
}

fn run_replay(csv: &Path, args: StoreArgs) -> Result<()> {
    let rows = sensors::read_csv_rows(csv)
        .with_context(|| format!("Failed to read {}", csv.display()))?;
    let store = open_store(args.store)?;

    let mut pipeline =
        DiagnosticPipeline::new(SensorValidator::new(), OperationalMonitor::new())
            .with_store(Box::new(store));

    let mut processed = 0usize;
    let mut skipped = 0usize;
    for row in &rows {
        let oracle = match (row.prediction, row.probability) {
            (Some(label), Some(probability)) => RecordedOracle::from_label(label, probability),
            _ => None,
        };
        let Some(oracle) = oracle else {
            warn!(line = row.line, "Row lacks prediction or probability, skipping");
            skipped += 1;
            continue;
        };

        match pipeline.diagnose_at(&oracle, &row.snapshot, row.timestamp.as_deref(), args.role) {
            Ok(_) => processed += 1,
            Err(e) => {
                warn!(line = row.line, error = %e, "Row rejected");
                skipped += 1;
            }
        }
    }

    info!(processed, skipped, csv = %csv.display(), "Replay complete");

    let monitor = pipeline.monitor();
    print_json(&serde_json::json!({
        "processed": processed,
        "skipped": skipped,
        "drift": monitor.detect_concept_drift(args.role),
        "health": monitor.get_system_health_report(args.role),
    }))
}

fn run_drift(args: StoreArgs) -> Result<()> {
    let store = open_store(args.store)?;
    print_json(&seeded_monitor(&store).detect_concept_drift(args.role))
}

fn run_health(args: StoreArgs) -> Result<()> {
    let store = open_store(args.store)?;
    print_json(&seeded_monitor(&store).get_system_health_report(args.role))
}

fn run_trend(args: StoreArgs, query: TrendQuery) -> Result<()> {
    let store = open_store(args.store)?;
    let outcome = TrendAnalyzer::new()
        .analyze(store.all(), &query, args.role)
        .context("Trend analysis failed")?;

    match &outcome {
        TrendOutcome::NoData => info!("No predictions in the requested window"),
        TrendOutcome::Success(report) => info!(
            predictions = report.total_predictions,
            direction = ?report.trend_direction,
            "Trend report ready"
        ),
    }
    print_json(&outcome)
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let cfg = match &args.config {
        Some(path) => MonitorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MonitorConfig::load(),
    };
    config::init(cfg);

    match args.command {
        SubCommand::Score { values, role } => run_score(&values, role),
        SubCommand::Replay { csv, store } => run_replay(&csv, store),
        SubCommand::Drift { store } => run_drift(store),
        SubCommand::Health { store } => run_health(store),
        SubCommand::Trend {
            store,
            from,
            to,
            params,
            within_day,
            start_time,
            end_time,
        } => {
            let query = TrendQuery {
                start_date: from,
                end_date: to,
                parameters: trend_parameters(params),
                time_analysis: if within_day {
                    TimeAnalysis::WithinDay
                } else {
                    TimeAnalysis::DailyOverview
                },
                start_time,
                end_time,
            };
            run_trend(store, query)
        }
    }
}
