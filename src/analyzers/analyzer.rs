use chrono::Utc;
use tracing::info;

use crate::analyzers::aggregate::{aggregate, drill_down};
use crate::analyzers::buckets::{Granularity, derive_buckets, find_bucket};
use crate::analyzers::demand::{surge_rows, surge_series};
use crate::analyzers::locations::{LocationField, location_view};
use crate::analyzers::types::{BucketDrillDown, DemandReport, LocationsReport, RidesSummary};
use crate::coordinates::CoordinateTable;
use crate::error::{AnalysisError, Result};
use crate::trips::{ProviderFilter, TripRecord, TripStore};

/// Loads the trips for `filter` and builds the rides-by-day/hour summary.
///
/// `selected` names the bucket to drill into; the first bucket is used when
/// it is `None`.
#[tracing::instrument(skip(store), fields(app = %filter.display_name()))]
pub fn rides_summary(
    store: &TripStore,
    filter: ProviderFilter,
    granularity: Granularity,
    selected: Option<&str>,
) -> Result<RidesSummary> {
    let trips = store.load(filter)?;
    summarize_rides(&trips, &filter.display_name(), granularity, selected)
}

/// Builds a [`RidesSummary`] from trips that are already loaded and filtered.
pub fn summarize_rides(
    trips: &[TripRecord],
    app: &str,
    granularity: Granularity,
    selected: Option<&str>,
) -> Result<RidesSummary> {
    let buckets = derive_buckets(trips, granularity);
    let aggregate = aggregate(trips, &buckets)?;

    let chosen = match selected {
        Some(label) => find_bucket(&buckets, label).ok_or_else(|| AnalysisError::UnknownBucket {
            label: label.to_string(),
        })?,
        None => buckets.first().ok_or(AnalysisError::EmptyBucketSet)?,
    };
    let chosen_trips = drill_down(trips, &chosen.bucket);

    info!(
        app,
        %granularity,
        total = aggregate.stats.total,
        average = aggregate.stats.average,
        max = aggregate.stats.max.rides,
        max_label = %aggregate.stats.max.label,
        min = aggregate.stats.min.rides,
        min_label = %aggregate.stats.min.label,
        "Rides summary"
    );

    Ok(RidesSummary {
        generated_at: Utc::now(),
        app: app.to_string(),
        granularity,
        series: aggregate.rows(&buckets),
        stats: aggregate.stats,
        selected: BucketDrillDown {
            label: chosen.label.clone(),
            rides: chosen_trips.len(),
            trips: chosen_trips,
        },
    })
}

/// Loads the trips for `filter` and ranks the top `k` pickups and destinations.
#[tracing::instrument(skip(store, table), fields(app = %filter.display_name()))]
pub fn pickups_and_destinations(
    store: &TripStore,
    filter: ProviderFilter,
    k: usize,
    table: &CoordinateTable,
) -> Result<LocationsReport> {
    let trips = store.load(filter)?;
    rank_locations(&trips, &filter.display_name(), k, table)
}

pub fn rank_locations(
    trips: &[TripRecord],
    app: &str,
    k: usize,
    table: &CoordinateTable,
) -> Result<LocationsReport> {
    let pickups = location_view(trips, LocationField::Source, k, table)?;
    let destinations = location_view(trips, LocationField::Destination, k, table)?;

    info!(
        app,
        k,
        pickups = pickups.top.len(),
        destinations = destinations.top.len(),
        "Locations ranked"
    );

    Ok(LocationsReport {
        generated_at: Utc::now(),
        app: app.to_string(),
        pickups,
        destinations,
    })
}

/// Loads the trips for `filter` and extracts the surging ones.
#[tracing::instrument(skip(store), fields(app = %filter.display_name()))]
pub fn ridesharing_demand(store: &TripStore, filter: ProviderFilter) -> Result<DemandReport> {
    let trips = store.load(filter)?;
    extract_demand(&trips, &filter.display_name())
}

/// # Errors
///
/// [`AnalysisError::NoQualifyingRecords`] if no trip has surge above 1.
pub fn extract_demand(trips: &[TripRecord], app: &str) -> Result<DemandReport> {
    let series = surge_series(trips).require_qualifying()?;
    let rows = surge_rows(trips);

    info!(app, surging = series.len(), "Surge demand extracted");

    Ok(DemandReport {
        generated_at: Utc::now(),
        app: app.to_string(),
        series,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::Provider;

    #[test]
    fn test_summary_defaults_to_first_bucket() {
        let trips = vec![
            trip(1.0, 1, 15, 8, "Fenway"),
            trip(2.0, 1, 15, 9, "Back Bay"),
            trip(3.0, 1, 16, 8, "West End"),
        ];
        let summary = summarize_rides(&trips, "Uber", Granularity::Day, None).unwrap();

        assert_eq!(summary.selected.label, "01/15");
        assert_eq!(summary.selected.rides, 2);
        assert_eq!(summary.selected.trips[1].source, "Back Bay");
        assert_eq!(summary.stats.total, 3);
        assert_eq!(summary.series.len(), 2);
    }

    #[test]
    fn test_summary_drills_into_selected_hour() {
        let trips = vec![
            trip(1.0, 1, 15, 8, "Fenway"),
            trip(2.0, 1, 15, 10, "Back Bay"),
            trip(3.0, 1, 16, 10, "West End"),
        ];
        let summary = summarize_rides(&trips, "Uber", Granularity::Hour, Some("10-11")).unwrap();

        assert_eq!(summary.selected.rides, 2);
        let labels: Vec<&str> = summary.series.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["08-09", "09-10", "10-11"]);
    }

    #[test]
    fn test_summary_unknown_selection() {
        let trips = vec![trip(1.0, 1, 15, 8, "Fenway")];
        let err = summarize_rides(&trips, "Uber", Granularity::Day, Some("02/30")).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownBucket { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_summary_of_nothing_is_empty_bucket_set() {
        let err = summarize_rides(&[], "Lyft", Granularity::Hour, None).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyBucketSet));
    }

    #[test]
    fn test_rank_locations_both_fields() {
        let mut trips = vec![
            trip(1.0, 1, 15, 8, "Fenway"),
            trip(2.0, 1, 15, 9, "Fenway"),
            trip(3.0, 1, 16, 8, "West End"),
        ];
        trips[2].destination = "North End".to_string();

        let report = rank_locations(&trips, "Uber", 3, &CoordinateTable::boston()).unwrap();
        assert_eq!(report.pickups.top[0].name, "Fenway");
        assert_eq!(report.pickups.top[0].rides, 2);
        assert_eq!(report.destinations.top.len(), 2);
        assert!(report.pickups.center.is_some());
    }

    #[test]
    fn test_demand_without_surge() {
        let trips = vec![trip(1.0, 1, 15, 8, "Fenway")];
        let err = extract_demand(&trips, "Lyft").unwrap_err();
        assert!(matches!(err, AnalysisError::NoQualifyingRecords));
    }

    #[test]
    fn test_demand_with_surge() {
        let mut trips = vec![trip(1.0, 1, 15, 8, "Fenway"), trip(2.0, 1, 15, 9, "Fenway")];
        trips[1].surge_multiplier = 1.5;

        let report = extract_demand(&trips, "Lyft").unwrap();
        assert_eq!(report.series.hours, vec![9]);
        assert_eq!(report.rows.len(), 1);
    }

    // Helper functions for tests
    fn trip(timestamp: f64, month: u32, day: u32, hour: u32, source: &str) -> TripRecord {
        TripRecord {
            timestamp,
            provider: Provider::Uber,
            month,
            day,
            hour,
            source: source.to_string(),
            destination: "Back Bay".to_string(),
            temperature: 40.0,
            surge_multiplier: 1.0,
        }
    }
}
