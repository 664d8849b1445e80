//! Output module: run statistics and end-of-run exports
//!
//! This module owns the statistics aggregator fed by the pipeline, the
//! printable end-of-run summary, and the jobs.json / jobs.csv exports.

mod export;
mod stats;

pub use export::{export_jobs, prepare_output_directory};
pub use stats::{CrawlSummary, Reporter, SalarySample};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
