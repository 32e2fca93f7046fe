//! Surge demand projection for the hour / temperature / surge scatter.

use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::SurgeRow;
use crate::error::{AnalysisError, Result};
use crate::trips::TripRecord;

/// Surge multipliers above this value mark elevated demand.
pub const SURGE_THRESHOLD: f64 = 1.0;

/// Three series aligned index-by-index, one entry per surging trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurgeSeries {
    pub hours: Vec<u32>,
    pub temperatures: Vec<f64>,
    pub surge_multipliers: Vec<f64>,
}

impl SurgeSeries {
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Turns an empty series into [`AnalysisError::NoQualifyingRecords`].
    pub fn require_qualifying(self) -> Result<Self> {
        if self.is_empty() {
            Err(AnalysisError::NoQualifyingRecords)
        } else {
            Ok(self)
        }
    }
}

fn is_surging(trip: &TripRecord) -> bool {
    trip.surge_multiplier > SURGE_THRESHOLD
}

/// Hour, temperature and surge multiplier of every trip with surge above
/// [`SURGE_THRESHOLD`], in input order.
pub fn surge_series(trips: &[TripRecord]) -> SurgeSeries {
    let mut series = SurgeSeries::default();
    for trip in trips.iter().filter(|t| is_surging(t)) {
        series.hours.push(trip.hour);
        series.temperatures.push(trip.temperature);
        series.surge_multipliers.push(trip.surge_multiplier);
    }

    debug!(
        trips = trips.len(),
        surging = series.len(),
        "Surge series extracted"
    );
    series
}

/// Table view of the surging trips, including the provider.
pub fn surge_rows(trips: &[TripRecord]) -> Vec<SurgeRow> {
    trips
        .iter()
        .filter(|t| is_surging(t))
        .map(|t| SurgeRow {
            provider: t.provider,
            hour: t.hour,
            temperature: t.temperature,
            surge_multiplier: t.surge_multiplier,
        })
        .collect()
}
