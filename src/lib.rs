//! Title Grabber: resumable page and article title harvester
//!
//! This crate reads URLs out of arbitrary text input, fetches each page with a
//! bounded pool of concurrent workers, extracts the page title and the main
//! article heading, and writes the results to a CSV file. Rows from a previous
//! output file are reused instead of being fetched again.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-URL failures never surface here: they are contained inside the worker
/// task that produced them and only ever degrade to "no row written".
#[derive(Debug, Error)]
pub enum GrabberError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read input {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to open temporary output file in {dir}: {source}")]
    TempFile {
        dir: String,
        source: std::io::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },

    #[error("Worker pool closed while dispatching")]
    WorkerPoolClosed,

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
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, GrabberError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub use config::{Config, FetchPolicy};
pub use crawler::{run_batch, Coordinator, FetchError, Fetcher, RowError, RowResolver};
pub use output::{ResumeCache, Row, RunSummary};
pub use state::BatchState;
