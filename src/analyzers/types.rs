//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::buckets::Granularity;
use crate::analyzers::demand::SurgeSeries;
use crate::coordinates::Coordinate;
use crate::trips::Provider;

/// A bucket count together with the label of the bucket it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extreme {
    pub rides: usize,
    pub label: String,
}

/// Summary statistics over the per-bucket ride counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub total: usize,
    /// `total / bucket_count`, truncated.
    pub average: usize,
    pub max: Extreme,
    pub min: Extreme,
}

/// Per-bucket counts aligned index-by-index with the bucket sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketAggregate {
    pub counts: Vec<usize>,
    pub stats: BucketStats,
}

/// One bar of the rides chart; `average` is the same for every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketRow {
    pub label: String,
    pub rides: usize,
    pub average: usize,
}

/// Raw trip projection shown when drilling into a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RideRow {
    pub provider: Provider,
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketDrillDown {
    pub label: String,
    pub rides: usize,
    pub trips: Vec<RideRow>,
}

/// Ride counts by day or hour for one provider selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidesSummary {
    pub generated_at: DateTime<Utc>,
    pub app: String,
    pub granularity: Granularity,
    pub series: Vec<BucketRow>,
    pub stats: BucketStats,
    pub selected: BucketDrillDown,
}

/// A location name with its ride count and map position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRank {
    pub name: String,
    pub rides: usize,
    pub lat: f64,
    pub lon: f64,
}

/// Top locations for one field plus the point a map of them centers on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub top: Vec<LocationRank>,
    pub center: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationsReport {
    pub generated_at: DateTime<Utc>,
    pub app: String,
    pub pickups: LocationView,
    pub destinations: LocationView,
}

/// One trip with elevated surge pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurgeRow {
    pub provider: Provider,
    pub hour: u32,
    pub temperature: f64,
    pub surge_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandReport {
    pub generated_at: DateTime<Utc>,
    pub app: String,
    pub series: SurgeSeries,
    pub rows: Vec<SurgeRow>,
}
