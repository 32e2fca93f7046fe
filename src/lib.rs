pub mod analyzers;
pub mod coordinates;
pub mod error;
pub mod output;
pub mod trips;

pub use error::{AnalysisError, Result};
