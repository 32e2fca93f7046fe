//! Trip log loading and provider filtering.
//!
//! The dataset is read in full, stable-sorted by timestamp, then filtered
//! by provider. Filtering never reorders, so every sequence handed to the
//! analyzers is non-decreasing in timestamp.

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};

/// Columns that must be present in the dataset header.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "timestamp",
    "cab_type",
    "month",
    "day",
    "hour",
    "source",
    "destination",
    "temperature",
    "surge_multiplier",
];

/// Last valid value of the `hour` column.
pub const MAX_HOUR: u32 = 23;

/// Ride-hailing app that served a trip, read from the `cab_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Uber,
    Lyft,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Uber => write!(f, "Uber"),
            Provider::Lyft => write!(f, "Lyft"),
        }
    }
}

/// Which trips to keep after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderFilter {
    #[default]
    All,
    Only(Provider),
}

impl ProviderFilter {
    pub fn matches(&self, provider: Provider) -> bool {
        match self {
            ProviderFilter::All => true,
            ProviderFilter::Only(p) => *p == provider,
        }
    }

    /// Name used in report headings, e.g. "Uber and Lyft".
    pub fn display_name(&self) -> String {
        match self {
            ProviderFilter::All => "Uber and Lyft".to_string(),
            ProviderFilter::Only(p) => p.to_string(),
        }
    }
}

/// One row of the trip log.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TripRecord {
    /// Seconds since the Unix epoch; the ordering key.
    pub timestamp: f64,
    #[serde(rename = "cab_type")]
    pub provider: Provider,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub source: String,
    pub destination: String,
    pub temperature: f64,
    pub surge_multiplier: f64,
}

impl TripRecord {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }
}

/// Handle on a trip log file. Each [`TripStore::load`] re-reads the file and
/// returns an independent record set.
#[derive(Debug, Clone)]
pub struct TripStore {
    path: PathBuf,
}

impl TripStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every trip, sorts by timestamp and keeps those matching `filter`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::DataUnavailable`] if the file cannot be opened or read,
    /// [`AnalysisError::SchemaError`] if a required column is absent or a row
    /// does not fit [`TripRecord`].
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self, filter: ProviderFilter) -> Result<Vec<TripRecord>> {
        let file =
            File::open(&self.path).map_err(|e| AnalysisError::data_unavailable(&self.path, e))?;
        let trips = read_trips(file, &self.path, filter)?;

        info!(
            trips = trips.len(),
            provider = %filter.display_name(),
            "Trip log loaded"
        );
        Ok(trips)
    }
}

/// Reads, sorts and filters trips from any CSV source. `origin` is only used
/// in error messages.
pub fn read_trips<R: Read>(
    reader: R,
    origin: &Path,
    filter: ProviderFilter,
) -> Result<Vec<TripRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AnalysisError::data_unavailable(origin, e))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut trips = Vec::new();
    for (idx, result) in rdr.deserialize::<TripRecord>().enumerate() {
        let trip = result.map_err(|e| {
            if e.is_io_error() {
                AnalysisError::data_unavailable(origin, e)
            } else {
                AnalysisError::schema(format!("row {}: {}", idx + 1, e))
            }
        })?;
        if trip.hour > MAX_HOUR {
            return Err(AnalysisError::schema(format!(
                "row {}: hour {} out of range 0-{}",
                idx + 1,
                trip.hour,
                MAX_HOUR
            )));
        }
        trips.push(trip);
    }
    let total = trips.len();

    // sort_by is stable: equal timestamps keep file order
    trips.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    trips.retain(|t| filter.matches(t.provider));

    debug!(
        total,
        kept = trips.len(),
        first = ?trips.first().and_then(TripRecord::datetime),
        last = ?trips.last().and_then(TripRecord::datetime),
        "Trips sorted and filtered"
    );

    Ok(trips)
}
