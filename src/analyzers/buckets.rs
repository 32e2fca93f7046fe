//! Time bucket derivation.
//!
//! Day buckets are the distinct `(month, day)` pairs in first-encounter
//! order over the timestamp-sorted trips. Hour buckets cover every hour from
//! the earliest to the latest hour present, including hours with no trips.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

use crate::trips::TripRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Hour,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Hour => write!(f, "hour"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeBucket {
    CalendarDay { month: u32, day: u32 },
    /// Covers `[start_hour, start_hour + 1)`.
    HourRange { start_hour: u32 },
}

impl TimeBucket {
    /// `MM/DD` for days, `HH-HH` for hours, both zero-padded.
    pub fn label(&self) -> String {
        match self {
            TimeBucket::CalendarDay { month, day } => format!("{month:02}/{day:02}"),
            TimeBucket::HourRange { start_hour } => {
                format!("{:02}-{:02}", start_hour, start_hour + 1)
            }
        }
    }

    pub fn contains(&self, trip: &TripRecord) -> bool {
        match *self {
            TimeBucket::CalendarDay { month, day } => trip.month == month && trip.day == day,
            TimeBucket::HourRange { start_hour } => trip.hour == start_hour,
        }
    }
}

/// A derived bucket together with its display/lookup label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub bucket: TimeBucket,
    pub label: String,
}

impl From<TimeBucket> for Bucket {
    fn from(bucket: TimeBucket) -> Self {
        Self {
            label: bucket.label(),
            bucket,
        }
    }
}

/// Derives the ordered bucket set for `trips`. Empty input gives no buckets.
pub fn derive_buckets(trips: &[TripRecord], granularity: Granularity) -> Vec<Bucket> {
    let buckets: Vec<Bucket> = match granularity {
        Granularity::Day => distinct_days(trips)
            .into_iter()
            .map(|(month, day)| TimeBucket::CalendarDay { month, day }.into())
            .collect(),
        Granularity::Hour => hour_span(trips)
            .into_iter()
            .flatten()
            .map(|start_hour| TimeBucket::HourRange { start_hour }.into())
            .collect(),
    };

    debug!(%granularity, buckets = buckets.len(), "Buckets derived");
    buckets
}

/// Looks up a bucket by its label.
pub fn find_bucket<'a>(buckets: &'a [Bucket], label: &str) -> Option<&'a Bucket> {
    buckets.iter().find(|b| b.label == label)
}

fn distinct_days(trips: &[TripRecord]) -> Vec<(u32, u32)> {
    let mut seen = HashSet::new();
    let mut days = Vec::new();
    for trip in trips {
        let date = (trip.month, trip.day);
        if seen.insert(date) {
            days.push(date);
        }
    }
    days
}

fn hour_span(trips: &[TripRecord]) -> Option<RangeInclusive<u32>> {
    let first = trips.iter().map(|t| t.hour).min()?;
    let last = trips.iter().map(|t| t.hour).max()?;
    Some(first..=last)
}
