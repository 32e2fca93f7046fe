//! Ride log aggregation.
//!
//! This module buckets trips by calendar day or hour of day, counts rides
//! per bucket, ranks pickup and destination locations against a coordinate
//! table, and extracts the surge demand series.

pub mod aggregate;
pub mod analyzer;
pub mod buckets;
pub mod demand;
pub mod locations;
pub mod types;
pub mod utility;
