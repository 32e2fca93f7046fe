//! Top-K pickup and destination ranking.

use std::collections::HashMap;
use tracing::debug;

use crate::analyzers::types::{LocationRank, LocationView};
use crate::analyzers::utility::mean;
use crate::coordinates::{Coordinate, CoordinateTable};
use crate::error::Result;
use crate::trips::TripRecord;

/// Which location column to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Source,
    Destination,
}

impl LocationField {
    fn of(self, trip: &TripRecord) -> &str {
        match self {
            LocationField::Source => &trip.source,
            LocationField::Destination => &trip.destination,
        }
    }
}

/// Ride counts per distinct value of `field`, in first-encounter order.
pub fn frequencies(trips: &[TripRecord], field: LocationField) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for trip in trips {
        let name = field.of(trip);
        match index.get(name).copied() {
            Some(i) => counts[i].1 += 1,
            None => {
                index.insert(name, counts.len());
                counts.push((name.to_string(), 1));
            }
        }
    }
    counts
}

/// The `k` most frequent values of `field`, most frequent first, joined with
/// their coordinates. Equal counts keep first-encounter order.
///
/// # Errors
///
/// [`AnalysisError::UnknownLocation`](crate::error::AnalysisError::UnknownLocation)
/// if a ranked name has no entry in `table`.
pub fn top_k(
    trips: &[TripRecord],
    field: LocationField,
    k: usize,
    table: &CoordinateTable,
) -> Result<Vec<LocationRank>> {
    let mut counts = frequencies(trips, field);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);

    let ranked = counts
        .into_iter()
        .map(|(name, rides)| {
            let Coordinate { lat, lon } = table.resolve(&name)?;
            Ok(LocationRank {
                name,
                rides,
                lat,
                lon,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(?field, k, ranked = ranked.len(), "Locations ranked");
    Ok(ranked)
}

/// Mean latitude and longitude of the ranked locations.
pub fn map_center(ranks: &[LocationRank]) -> Option<Coordinate> {
    if ranks.is_empty() {
        return None;
    }
    let lats: Vec<f64> = ranks.iter().map(|r| r.lat).collect();
    let lons: Vec<f64> = ranks.iter().map(|r| r.lon).collect();
    Some(Coordinate {
        lat: mean(&lats),
        lon: mean(&lons),
    })
}

/// [`top_k`] plus the map center for the result.
pub fn location_view(
    trips: &[TripRecord],
    field: LocationField,
    k: usize,
    table: &CoordinateTable,
) -> Result<LocationView> {
    let top = top_k(trips, field, k, table)?;
    let center = map_center(&top);
    Ok(LocationView { top, center })
}
