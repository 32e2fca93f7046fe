use tracing::debug;

use crate::analyzers::buckets::{Bucket, TimeBucket};
use crate::analyzers::types::{BucketAggregate, BucketRow, BucketStats, Extreme, RideRow};
use crate::analyzers::utility::{first_max, first_min};
use crate::error::{AnalysisError, Result};
use crate::trips::TripRecord;

/// Counts trips per bucket and computes [`BucketStats`] over the counts.
///
/// The average is `trips.len() / buckets.len()` with integer truncation.
/// When several buckets share the max (or min) count, the earliest bucket
/// in `buckets` is reported.
///
/// # Errors
///
/// [`AnalysisError::EmptyBucketSet`] if `buckets` is empty.
pub fn aggregate(trips: &[TripRecord], buckets: &[Bucket]) -> Result<BucketAggregate> {
    let counts: Vec<usize> = buckets
        .iter()
        .map(|b| trips.iter().filter(|t| b.bucket.contains(t)).count())
        .collect();

    let total = trips.len();
    let average = total
        .checked_div(buckets.len())
        .ok_or(AnalysisError::EmptyBucketSet)?;

    let (max_idx, max_rides) = first_max(&counts).ok_or(AnalysisError::EmptyBucketSet)?;
    let (min_idx, min_rides) = first_min(&counts).ok_or(AnalysisError::EmptyBucketSet)?;

    debug!(
        total,
        buckets = buckets.len(),
        average,
        max = max_rides,
        min = min_rides,
        "Bucket counts aggregated"
    );

    Ok(BucketAggregate {
        stats: BucketStats {
            total,
            average,
            max: Extreme {
                rides: max_rides,
                label: buckets[max_idx].label.clone(),
            },
            min: Extreme {
                rides: min_rides,
                label: buckets[min_idx].label.clone(),
            },
        },
        counts,
    })
}

impl BucketAggregate {
    /// Chart rows pairing each bucket label with its count and the average.
    pub fn rows(&self, buckets: &[Bucket]) -> Vec<BucketRow> {
        buckets
            .iter()
            .zip(&self.counts)
            .map(|(bucket, &rides)| BucketRow {
                label: bucket.label.clone(),
                rides,
                average: self.stats.average,
            })
            .collect()
    }
}

/// Trips falling in `bucket`, projected to provider, source and destination.
pub fn drill_down(trips: &[TripRecord], bucket: &TimeBucket) -> Vec<RideRow> {
    trips
        .iter()
        .filter(|t| bucket.contains(t))
        .map(|t| RideRow {
            provider: t.provider,
            source: t.source.clone(),
            destination: t.destination.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::buckets::{Granularity, derive_buckets};
    use crate::trips::Provider;

    #[test]
    fn test_two_days_two_trips_each() {
        let trips = vec![
            trip(1.0, 1, 15, 8),
            trip(2.0, 1, 15, 9),
            trip(3.0, 1, 16, 8),
            trip(4.0, 1, 16, 10),
        ];
        let buckets = derive_buckets(&trips, Granularity::Day);
        let agg = aggregate(&trips, &buckets).unwrap();

        assert_eq!(agg.counts, vec![2, 2]);
        assert_eq!(agg.stats.total, 4);
        assert_eq!(agg.stats.average, 2);
        assert_eq!(agg.stats.max.label, "01/15");
        assert_eq!(agg.stats.min.label, "01/15");
    }

    #[test]
    fn test_average_truncates() {
        // 10 trips over 3 hour buckets: 10 / 3 = 3.33 -> 3
        let mut trips = Vec::new();
        for i in 0..10 {
            trips.push(trip(i as f64, 1, 15, 4 + (i % 3)));
        }
        let buckets = derive_buckets(&trips, Granularity::Hour);
        let agg = aggregate(&trips, &buckets).unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(agg.stats.average, 3);
    }

    #[test]
    fn test_average_truncates_rather_than_rounds() {
        // 5 trips over 3 buckets: 1.67 rounds to 2 but truncates to 1
        let trips = vec![
            trip(1.0, 1, 15, 8),
            trip(2.0, 1, 15, 8),
            trip(3.0, 1, 15, 8),
            trip(4.0, 1, 15, 9),
            trip(5.0, 1, 15, 10),
        ];
        let buckets = derive_buckets(&trips, Granularity::Hour);
        let agg = aggregate(&trips, &buckets).unwrap();
        assert_eq!(agg.stats.average, 1);
    }

    #[test]
    fn test_max_tie_reports_first_bucket() {
        // counts per hour 5..=8: [5, 7, 7, 2]
        let mut trips = Vec::new();
        let mut ts = 0.0;
        for (hour, n) in [(5, 5), (6, 7), (7, 7), (8, 2)] {
            for _ in 0..n {
                ts += 1.0;
                trips.push(trip(ts, 1, 15, hour));
            }
        }
        let buckets = derive_buckets(&trips, Granularity::Hour);
        let agg = aggregate(&trips, &buckets).unwrap();

        assert_eq!(agg.counts, vec![5, 7, 7, 2]);
        assert_eq!(
            agg.stats.max,
            Extreme {
                rides: 7,
                label: "06-07".to_string()
            }
        );
        assert_eq!(
            agg.stats.min,
            Extreme {
                rides: 2,
                label: "08-09".to_string()
            }
        );
    }

    #[test]
    fn test_hour_gap_counts_zero_and_becomes_min() {
        let trips = vec![trip(1.0, 1, 15, 3), trip(2.0, 1, 15, 5), trip(3.0, 1, 15, 5)];
        let buckets = derive_buckets(&trips, Granularity::Hour);
        let agg = aggregate(&trips, &buckets).unwrap();

        assert_eq!(agg.counts, vec![1, 0, 2]);
        assert_eq!(agg.stats.min.label, "04-05");
        assert_eq!(agg.stats.min.rides, 0);
        assert_eq!(agg.stats.max.label, "05-06");
    }

    #[test]
    fn test_counts_sum_to_total() {
        let trips = vec![
            trip(1.0, 12, 1, 0),
            trip(2.0, 12, 1, 23),
            trip(3.0, 12, 2, 12),
            trip(4.0, 12, 3, 12),
            trip(5.0, 12, 3, 7),
        ];
        for granularity in [Granularity::Day, Granularity::Hour] {
            let buckets = derive_buckets(&trips, granularity);
            let agg = aggregate(&trips, &buckets).unwrap();
            assert_eq!(agg.counts.iter().sum::<usize>(), trips.len());
            assert_eq!(agg.counts.len(), buckets.len());
        }
    }

    #[test]
    fn test_empty_bucket_set_fails_explicitly() {
        let buckets = derive_buckets(&[], Granularity::Day);
        assert!(buckets.is_empty());

        let err = aggregate(&[], &buckets).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyBucketSet));
    }

    #[test]
    fn test_rows_carry_average() {
        let trips = vec![trip(1.0, 1, 15, 8), trip(2.0, 1, 16, 8), trip(3.0, 1, 16, 8)];
        let buckets = derive_buckets(&trips, Granularity::Day);
        let agg = aggregate(&trips, &buckets).unwrap();

        let rows = agg.rows(&buckets);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].label, "01/16");
        assert_eq!(rows[1].rides, 2);
        assert!(rows.iter().all(|r| r.average == 1));
    }

    #[test]
    fn test_drill_down_projects_matching_trips() {
        let mut trips = vec![trip(1.0, 1, 15, 8), trip(2.0, 1, 15, 9), trip(3.0, 1, 16, 8)];
        trips[1].provider = Provider::Lyft;
        trips[1].source = "North End".to_string();

        let rows = drill_down(&trips, &TimeBucket::CalendarDay { month: 1, day: 15 });
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            RideRow {
                provider: Provider::Lyft,
                source: "North End".to_string(),
                destination: "Back Bay".to_string(),
            }
        );

        let rows = drill_down(&trips, &TimeBucket::HourRange { start_hour: 8 });
        assert_eq!(rows.len(), 2);
        assert!(drill_down(&trips, &TimeBucket::HourRange { start_hour: 7 }).is_empty());
    }

    // Helper functions for tests
    fn trip(timestamp: f64, month: u32, day: u32, hour: u32) -> TripRecord {
        TripRecord {
            timestamp,
            provider: Provider::Uber,
            month,
            day,
            hour,
            source: "Fenway".to_string(),
            destination: "Back Bay".to_string(),
            temperature: 40.0,
            surge_multiplier: 1.0,
        }
    }
}
