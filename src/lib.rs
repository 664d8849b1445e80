//! Pracant: a compliant job-listing crawler
//!
//! This crate crawls a paginated job-listing site, respecting robots.txt
//! permissions and a page budget. Job detail pages are fetched, parsed into
//! structured records, validated, persisted, and summarized at the end of
//! the run.

pub mod config;
pub mod crawler;
pub mod job;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Pracant operations
#[derive(Debug, Error)]
pub enum PracantError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Start URL disallowed by robots.txt: {url}")]
    StartUrlDisallowed { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Pracant operations
pub type Result<T> = std::result::Result<T, PracantError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use job::JobRecord;
pub use output::Reporter;
pub use robots::RobotsPolicy;
pub use state::{CrawlBudget, DedupRegistry, StopFlag};
