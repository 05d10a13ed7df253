use serde::Deserialize;

/// Main configuration structure for Shelf-Scrape
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Search target configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Base search URL; the keyword is appended as the `d` query parameter
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of pages to fetch per run; 0 means a full scan
    #[serde(rename = "page-limit", default)]
    pub page_limit: u32,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pool of browser identifiers; one is chosen at random per request
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// Fixed Accept-Language header sent with every request
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Pagination loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Lower bound of the randomized inter-page delay (milliseconds)
    #[serde(rename = "delay-min-ms", default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the randomized inter-page delay (milliseconds)
    #[serde(rename = "delay-max-ms", default = "default_delay_max_ms")]
    pub delay_max_ms: u64,
}

/// Output path configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for raw per-page HTML snapshots
    #[serde(rename = "raw-dir", default = "default_raw_dir")]
    pub raw_dir: String,

    /// Directory for the aggregate CSV table
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Base name used in the aggregate CSV filename; empty means derive
    /// from the keyword
    #[serde(rename = "output-base", default)]
    pub output_base: String,
}

fn default_base_url() -> String {
    "https://www.newegg.com/p/pl".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15".to_string(),
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0".to_string(),
    ]
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_delay_min_ms() -> u64 {
    1000
}

fn default_delay_max_ms() -> u64 {
    3000
}

fn default_raw_dir() -> String {
    "data/raw/raw_html_data".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_limit: 0,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agents: default_user_agents(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            data_dir: default_data_dir(),
            output_base: String::new(),
        }
    }
}
