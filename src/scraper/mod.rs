//! Scraper module for paginated search-result collection
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with header rotation
//! - Listing-block parsing and total-page detection
//! - The pagination loop with its stopping rules

mod controller;
mod fetcher;
mod parser;

pub use controller::{build_search_url, PaginationController, ScrapeOutcome, StopReason};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use parser::{parse_search_page, ParsedSearchPage};

use crate::config::Config;
use crate::output::{aggregate_filename, CsvSink, RecordSink};
use std::path::{Path, PathBuf};

/// Runs one complete scrape job for a keyword
///
/// This is the main entry point for a run. It will:
/// 1. Create the snapshot/CSV sink
/// 2. Drive the pagination loop for the keyword
/// 3. Write the accumulated records to the aggregate CSV
///
/// The aggregate save is the last action of the run; its failure is the
/// only error this function reports. A fetch failure mid-run still
/// produces an outcome with the records collected so far.
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `keyword` - The search keyword
///
/// # Returns
///
/// * `Ok(ScrapeOutcome)` - The run's records and stop condition
/// * `Err(ScrapeError)` - Sink setup or aggregate save failed
pub async fn run_job(config: &Config, keyword: &str) -> crate::Result<ScrapeOutcome> {
    let sink = CsvSink::new(&config.output.raw_dir)?;
    let controller = PaginationController::new(config, sink)?;

    let outcome = controller.run(keyword).await;

    if outcome.records.is_empty() {
        tracing::warn!("No data fetched for '{}'", keyword);
        return Ok(outcome);
    }

    let csv_path = aggregate_path(config, keyword);
    tracing::info!("Saving aggregate table to {}", csv_path.display());
    controller.sink().save_records(&outcome.records, &csv_path)?;

    Ok(outcome)
}

/// Computes the aggregate CSV path for a keyword under the current config
///
/// The output base defaults to the underscored keyword when the config
/// leaves it empty.
pub fn aggregate_path(config: &Config, keyword: &str) -> PathBuf {
    let base = if config.output.output_base.is_empty() {
        keyword.replace(' ', "_")
    } else {
        config.output.output_base.clone()
    };
    Path::new(&config.output.data_dir).join(aggregate_filename(&base, config.search.page_limit))
}
