use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::AnalysisError;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

/// Maps location names to coordinates for the map views.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "Back Bay": [42.3503, -71.0810],
///   "Fenway": [42.3429, -71.1003]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: HashMap<String, Coordinate>,
}

impl CoordinateTable {
    /// Loads the table from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, Coordinate> = serde_json::from_str(&content)?;
        Ok(Self { entries })
    }

    /// The twelve Boston neighbourhoods that appear in the sample trip log.
    pub fn boston() -> Self {
        [
            ("Back Bay", 42.3503, -71.0810),
            ("Beacon Hill", 42.3588, -71.0707),
            ("Boston University", 42.3505, -71.1054),
            ("Fenway", 42.3429, -71.1003),
            ("Financial District", 42.3559, -71.0550),
            ("Haymarket Square", 42.3634, -71.0586),
            ("Northeastern University", 42.3398, -71.0892),
            ("North End", 42.3647, -71.0542),
            ("North Station", 42.3661, -71.0631),
            ("South Station", 42.3519, -71.0551),
            ("Theatre District", 42.3519, -71.0643),
            ("West End", 42.3644, -71.0661),
        ]
        .into_iter()
        .map(|(name, lat, lon)| (name, Coordinate { lat, lon }))
        .collect()
    }

    pub fn get(&self, name: &str) -> Option<Coordinate> {
        self.entries.get(name).copied()
    }

    /// Like [`CoordinateTable::get`], but a miss is a data-integrity error.
    pub fn resolve(&self, name: &str) -> Result<Coordinate, AnalysisError> {
        self.get(name).ok_or_else(|| AnalysisError::UnknownLocation {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Coordinate)> for CoordinateTable {
    fn from_iter<I: IntoIterator<Item = (S, Coordinate)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
