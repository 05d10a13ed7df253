//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building an HTTP client with bounded timeouts
//! - Rotating through a pool of browser identifiers per request
//! - GET requests for search-result pages
//! - Error classification
//!
//! There is deliberately no retry logic here: a failed fetch is reported to
//! the caller, and the pagination loop treats it as a terminal condition.

use crate::config::FetcherConfig;
use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body, verbatim
        body: String,
    },

    /// Transport error or non-2xx status; never retried internally
    Failed {
        /// Human-readable cause
        error: String,
    },
}

impl FetchResult {
    /// Returns the body if the fetch succeeded
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchResult::Success { body, .. } => Some(body),
            FetchResult::Failed { .. } => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is attached per request rather than here, so that each
/// page fetch can draw a fresh identifier from the configured pool.
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Picks a browser identifier uniformly at random from the configured pool
fn pick_user_agent(config: &FetcherConfig) -> &str {
    config
        .user_agents
        .choose(&mut rand::thread_rng())
        .map(String::as_str)
        .unwrap_or("Mozilla/5.0")
}

/// Fetches a search-result page
///
/// Attaches a randomly selected user agent plus the fixed language
/// preference, issues a GET with the client's bounded timeout, and returns
/// the body verbatim on a 2xx response. Any transport error or non-2xx
/// status is classified into a human-readable `Failed` cause.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `config` - The fetcher configuration (user-agent pool, language)
/// * `url` - The fully-formed page URL, query parameters included
///
/// # Returns
///
/// A FetchResult carrying the body or the failure cause
pub async fn fetch_page(client: &Client, config: &FetcherConfig, url: &str) -> FetchResult {
    let request = client
        .get(url)
        .header(USER_AGENT, pick_user_agent(config))
        .header(ACCEPT_LANGUAGE, &config.accept_language);

    match request.send().await {
        Ok(response) => {
            let status = response.status();

            if !status.is_success() {
                return FetchResult::Failed {
                    error: format!("HTTP status {}", status),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::Failed {
                    error: format!("Failed to read response body: {}", e),
                },
            }
        }
        Err(e) => {
            // Classify error
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchResult::Failed { error }
        }
    }
}
