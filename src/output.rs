//! Output formatting and persistence for analysis reports.
//!
//! Supports log-line rendering, JSON serialization, and CSV export of the
//! chart series.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::buckets::Granularity;
use crate::analyzers::types::{DemandReport, LocationView, LocationsReport, RidesSummary};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &impl std::fmt::Debug) {
    debug!("{:#?}", report);
}

/// Renders a report as pretty-printed JSON.
pub fn to_json(report: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
pub fn write_rows<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV rows");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn log_summary(summary: &RidesSummary) {
    let app = summary.app.as_str();
    let stats = &summary.stats;

    info!(app, total = stats.total, "Total number of sample rides");

    let selected = &summary.selected;
    match summary.granularity {
        Granularity::Day => info!(
            "There were {} {} rides on {}.",
            selected.rides, app, selected.label
        ),
        Granularity::Hour => info!(
            "There were {} {} rides between timeframe {}.",
            selected.rides, app, selected.label
        ),
    }
    for trip in &selected.trips {
        debug!(
            provider = %trip.provider,
            source = %trip.source,
            destination = %trip.destination,
            "Ride"
        );
    }

    info!(
        "There were {} {} rides per {}.",
        stats.average, app, summary.granularity
    );
    info!(
        "Max number of rides is {} on {}.",
        stats.max.rides, stats.max.label
    );
    info!(
        "Min number of rides is {} on {}.",
        stats.min.rides, stats.min.label
    );
}

pub fn log_locations(report: &LocationsReport) {
    log_location_view("pickups", &report.app, &report.pickups);
    log_location_view("destinations", &report.app, &report.destinations);
}

fn log_location_view(kind: &str, app: &str, view: &LocationView) {
    info!(app, top = view.top.len(), "Most requested {}", kind);
    for rank in &view.top {
        info!(
            location = %rank.name,
            rides = rank.rides,
            lat = rank.lat,
            lon = rank.lon,
            "{}", kind
        );
    }
    if let Some(center) = view.center {
        debug!(lat = center.lat, lon = center.lon, "Map center for {}", kind);
    }
}

pub fn log_demand(report: &DemandReport) {
    info!(
        app = %report.app,
        surging = report.rows.len(),
        "Rides with surge multipliers greater than 1"
    );
    for row in &report.rows {
        debug!(
            provider = %row.provider,
            hour = row.hour,
            temperature = row.temperature,
            surge_multiplier = row.surge_multiplier,
            "Surge"
        );
    }
}
