//! CLI entry point for the ride-hailing trip summary tool.
//!
//! Provides subcommands for ride counts by day or hour, the most requested
//! pickups and destinations, and the surge demand series.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rideshare_summary::analyzers::analyzer::{
    pickups_and_destinations, rides_summary, ridesharing_demand,
};
use rideshare_summary::analyzers::buckets::Granularity;
use rideshare_summary::coordinates::CoordinateTable;
use rideshare_summary::output::{
    log_demand, log_locations, log_summary, print_pretty, to_json, write_rows,
};
use rideshare_summary::trips::{Provider, ProviderFilter, TripStore};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_DATA_PATH: &str = "ridesharesample.csv";

#[derive(Parser)]
#[command(name = "rideshare_summary")]
#[command(about = "A tool to summarize ride-hailing trip logs", long_about = None)]
struct Cli {
    /// Trip log CSV (defaults to $RIDESHARE_DATA, then ridesharesample.csv)
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<String>,

    /// JSON file mapping location names to [lat, lon] (defaults to $RIDESHARE_LOCATIONS, then the built-in Boston table)
    #[arg(long, global = true, value_name = "FILE")]
    locations: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count rides by day or by hour
    Summary {
        #[arg(short, long, value_enum, default_value_t = App::Both)]
        app: App,

        #[arg(short, long, value_enum, default_value_t = By::Day)]
        by: By,

        /// Bucket label to drill into, e.g. "12/16" or "09-10" (defaults to the first)
        #[arg(short, long)]
        select: Option<String>,

        /// CSV file to write the chart series to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the report as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rank the most requested pickups and destinations
    Locations {
        #[arg(short, long, value_enum, default_value_t = App::Both)]
        app: App,

        /// Number of locations to keep per ranking
        #[arg(short = 'k', long, default_value_t = 3)]
        top: usize,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Extract hour, temperature and surge for rides with surge above 1
    Demand {
        #[arg(short, long, value_enum, default_value_t = App::Both)]
        app: App,

        /// CSV file to write the surge table to
        #[arg(short, long)]
        output: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum App {
    Uber,
    Lyft,
    Both,
}

impl From<App> for ProviderFilter {
    fn from(app: App) -> Self {
        match app {
            App::Uber => ProviderFilter::Only(Provider::Uber),
            App::Lyft => ProviderFilter::Only(Provider::Lyft),
            App::Both => ProviderFilter::All,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum By {
    Day,
    Hour,
}

impl From<By> for Granularity {
    fn from(by: By) -> Self {
        match by {
            By::Day => Granularity::Day,
            By::Hour => Granularity::Hour,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/rideshare_summary.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rideshare_summary.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let data_path = cli
        .data
        .or_else(|| std::env::var("RIDESHARE_DATA").ok())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let store = TripStore::new(&data_path);
    info!(path = %store.path().display(), "Using trip log");

    match cli.command {
        Commands::Summary {
            app,
            by,
            select,
            output,
            json,
        } => {
            let result = rides_summary(&store, app.into(), by.into(), select.as_deref());
            let Some(summary) = degrade(result)? else {
                return Ok(());
            };

            log_summary(&summary);
            print_pretty(&summary);
            if let Some(path) = output {
                write_rows(&path, &summary.series)?;
                info!(path = %path, "Ride series written");
            }
            if json {
                println!("{}", to_json(&summary)?);
            }
        }
        Commands::Locations { app, top, json } => {
            let locations_path = cli
                .locations
                .or_else(|| std::env::var("RIDESHARE_LOCATIONS").ok());
            let table = match locations_path {
                Some(path) => {
                    info!(path = %path, "Loading coordinate table");
                    CoordinateTable::load(&path)?
                }
                None => CoordinateTable::boston(),
            };
            if table.is_empty() {
                warn!("Coordinate table is empty; every ranked location will be unknown");
            } else {
                debug!(locations = table.len(), "Coordinate table ready");
            }

            let result = pickups_and_destinations(&store, app.into(), top, &table);
            let Some(report) = degrade(result)? else {
                return Ok(());
            };

            log_locations(&report);
            if json {
                println!("{}", to_json(&report)?);
            }
        }
        Commands::Demand { app, output, json } => {
            let result = ridesharing_demand(&store, app.into());
            let Some(report) = degrade(result)? else {
                return Ok(());
            };

            log_demand(&report);
            if let Some(path) = output {
                write_rows(&path, &report.rows)?;
                info!(path = %path, "Surge table written");
            }
            if json {
                println!("{}", to_json(&report)?);
            }
        }
    }

    Ok(())
}

/// Reports empty selections as a warning instead of failing the run.
fn degrade<T>(result: rideshare_summary::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            warn!(reason = %e, "No data for this selection");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
