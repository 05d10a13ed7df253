use crate::config::types::{Config, FetcherConfig, OutputConfig, ScraperConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the search target configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates the HTTP fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user-agents must contain at least one entry".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agents entries cannot be empty".to_string(),
        ));
    }

    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept-language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the pagination loop configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.delay_min_ms > config.delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "delay-min-ms ({}) cannot exceed delay-max-ms ({})",
            config.delay_min_ms, config.delay_max_ms
        )));
    }

    Ok(())
}

/// Validates the output path configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.raw_dir.is_empty() {
        return Err(ConfigError::Validation(
            "raw-dir cannot be empty".to_string(),
        ));
    }

    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
