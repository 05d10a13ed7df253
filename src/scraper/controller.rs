//! Pagination controller - the fetch/snapshot/parse loop
//!
//! This module drives a scrape run across search-result pages. It owns all
//! run state (current page, discovered total pages, accumulated records)
//! and the stopping rules:
//! - a caller-supplied page limit,
//! - a fetch failure (no retry; prior pages' data is kept),
//! - a zero-record page (treated as the end of useful data),
//! - reaching the total page count reported by the site.
//!
//! When the site never reports a total page count, the loop simply runs
//! until an empty page appears; there is no hidden page cap. If the
//! reported count and actual emptiness disagree, whichever stop condition
//! fires first wins.

use crate::config::{Config, FetcherConfig, ScraperConfig, SearchConfig};
use crate::output::RecordSink;
use crate::record::ProductRecord;
use crate::scraper::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::scraper::parser::parse_search_page;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;

/// Why a scrape run stopped
///
/// All variants are terminal and all return the accumulated records;
/// callers distinguish success-with-data from zero-data by record count,
/// not by which stop fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The caller-supplied page limit was reached
    PageLimit,

    /// A page fetch failed; data from prior pages is preserved
    FetchError,

    /// A page parsed to zero records
    NoResults,

    /// The last page reported by the site was fetched
    LastPage,
}

/// Result of one complete scrape run
#[derive(Debug)]
pub struct ScrapeOutcome {
    /// Accumulated records in page order, document order within a page
    pub records: Vec<ProductRecord>,

    /// Number of pages successfully fetched
    pub pages_fetched: u32,

    /// Total page count reported by the site, if one was ever parsed
    pub total_pages: Option<u32>,

    /// The stop condition that terminated the loop
    pub stop_reason: StopReason,
}

/// Drives the paginated scrape loop for one keyword at a time
///
/// The controller is the only stateful component: the fetcher and parser
/// are pure functions of their inputs, and the sink is write-only.
pub struct PaginationController<S: RecordSink> {
    search: SearchConfig,
    fetcher: FetcherConfig,
    scraper: ScraperConfig,
    client: Client,
    sink: S,
}

impl<S: RecordSink> PaginationController<S> {
    /// Creates a controller from a configuration and a persistence sink
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    /// * `sink` - Destination for raw page snapshots
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationController)` - Ready to run
    /// * `Err(ScrapeError)` - HTTP client construction failed
    pub fn new(config: &Config, sink: S) -> crate::Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        Ok(Self {
            search: config.search.clone(),
            fetcher: config.fetcher.clone(),
            scraper: config.scraper.clone(),
            client,
            sink,
        })
    }

    /// Runs the scrape loop for a keyword
    ///
    /// Pages are fetched strictly sequentially, with a randomized
    /// politeness delay between them. The run never returns an error:
    /// every failure mode is a terminal state that yields whatever has
    /// accumulated so far.
    pub async fn run(&self, keyword: &str) -> ScrapeOutcome {
        let search_url = build_search_url(&self.search.base_url, keyword);
        let page_limit = self.search.page_limit;

        if page_limit > 0 {
            tracing::info!(
                "Starting scrape for keyword '{}' (limited to {} pages)",
                keyword,
                page_limit
            );
        } else {
            tracing::info!("Starting scrape for keyword '{}' (full scan)", keyword);
        }

        let mut current_page: u32 = 1;
        let mut total_pages: Option<u32> = None;
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut pages_fetched: u32 = 0;

        let stop_reason = loop {
            if page_limit > 0 && current_page > page_limit {
                tracing::info!("Reached page limit ({}), stopping", page_limit);
                break StopReason::PageLimit;
            }

            let url = page_url(&search_url, current_page);
            tracing::info!("Fetching page {} ({})", current_page, url);

            let body = match fetch_page(&self.client, &self.fetcher, &url).await {
                FetchResult::Success { body, .. } => body,
                FetchResult::Failed { error } => {
                    tracing::error!("Failed to fetch page {}: {}, stopping", current_page, error);
                    break StopReason::FetchError;
                }
            };
            pages_fetched += 1;

            // Snapshot writes are best-effort; a failure must not end the run
            match self.sink.save_snapshot(keyword, current_page, &body) {
                Ok(path) => tracing::debug!("Saved raw snapshot to {}", path.display()),
                Err(e) => {
                    tracing::warn!("Failed to save snapshot for page {}: {}", current_page, e)
                }
            }

            let parsed = parse_search_page(&body);

            if total_pages.is_none() {
                if let Some(n) = parsed.total_pages {
                    tracing::info!("Total pages detected: {}", n);
                    total_pages = Some(n);
                }
            }

            if parsed.records.is_empty() {
                tracing::info!("No items found on page {}, stopping", current_page);
                break StopReason::NoResults;
            }

            tracing::debug!(
                "Parsed {} records from page {}",
                parsed.records.len(),
                current_page
            );
            records.extend(parsed.records);

            if let Some(n) = total_pages {
                if current_page >= n {
                    tracing::info!("Reached the last page reported by the site, stopping");
                    break StopReason::LastPage;
                }
            }

            current_page += 1;
            self.politeness_delay().await;
        };

        tracing::info!(
            "Scrape finished: {} records from {} pages ({:?})",
            records.len(),
            pages_fetched,
            stop_reason
        );

        ScrapeOutcome {
            records,
            pages_fetched,
            total_pages,
            stop_reason,
        }
    }

    /// Returns the sink this controller snapshots into
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Sleeps a uniformly random duration from the configured delay range
    async fn politeness_delay(&self) {
        let delay_ms = rand::thread_rng()
            .gen_range(self.scraper.delay_min_ms..=self.scraper.delay_max_ms);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Builds the base search URL for a keyword
///
/// The keyword travels as the `d` query parameter with spaces encoded
/// as `+`, matching the target site's own search links.
pub fn build_search_url(base_url: &str, keyword: &str) -> String {
    format!("{}?d={}", base_url, keyword.replace(' ', "+"))
}

/// Builds the URL for a given page: page 1 is the bare search URL,
/// page 2 and beyond append a page parameter
fn page_url(search_url: &str, page: u32) -> String {
    if page > 1 {
        format!("{}&page={}", search_url, page)
    } else {
        search_url.to_string()
    }
}
