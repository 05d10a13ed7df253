//! Shelf-Scrape: a paginated product-listing scraper
//!
//! This crate fetches e-commerce search-result pages for a keyword, parses
//! heterogeneous listing markup into typed product records, snapshots raw
//! HTML per page, and writes the accumulated records to a CSV aggregate
//! table for downstream offline analysis.

pub mod config;
pub mod output;
pub mod record;
pub mod scraper;

use thiserror::Error;

/// Main error type for Shelf-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

/// Result type alias for Shelf-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types. The scraper module path is spelled out
// because `scraper` is also the name of the HTML-parsing crate.
pub use config::Config;
pub use crate::scraper::{PaginationController, ScrapeOutcome, StopReason};
pub use record::ProductRecord;
