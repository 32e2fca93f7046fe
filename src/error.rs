//! Error taxonomy for trip loading and analysis.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The trip dataset could not be opened or read.
    #[error("Trip data unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// A required column is missing or a cell does not fit the record shape.
    #[error("Schema error: {reason}")]
    SchemaError { reason: String },

    /// No buckets could be derived, so per-bucket statistics are undefined.
    #[error("No time buckets could be derived from the selected trips")]
    EmptyBucketSet,

    /// A location name has no entry in the coordinate table.
    #[error("Location '{name}' is missing from the coordinate table")]
    UnknownLocation { name: String },

    /// A filter matched zero trips.
    #[error("No qualifying records for this selection")]
    NoQualifyingRecords,

    /// A drill-down selection names a bucket that was not derived.
    #[error("No bucket labelled '{label}' in this selection")]
    UnknownBucket { label: String },
}

impl AnalysisError {
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        Self::SchemaError {
            reason: reason.into(),
        }
    }

    /// Empty selections degrade to a "no data" message; everything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyBucketSet | Self::NoQualifyingRecords | Self::UnknownBucket { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(AnalysisError::EmptyBucketSet.is_recoverable());
        assert!(AnalysisError::NoQualifyingRecords.is_recoverable());
        assert!(
            AnalysisError::UnknownBucket {
                label: "13/45".into()
            }
            .is_recoverable()
        );

        assert!(!AnalysisError::schema("missing column 'hour'").is_recoverable());
        assert!(!AnalysisError::data_unavailable("nope.csv", "not found").is_recoverable());
        assert!(
            !AnalysisError::UnknownLocation {
                name: "Narnia".into()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_messages_carry_context() {
        let err = AnalysisError::data_unavailable("rides.csv", "No such file");
        assert_eq!(
            err.to_string(),
            "Trip data unavailable at rides.csv: No such file"
        );

        let err = AnalysisError::UnknownLocation {
            name: "Narnia".into(),
        };
        assert!(err.to_string().contains("Narnia"));
    }
}
