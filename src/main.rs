//! Shelf-Scrape main entry point
//!
//! This is the command-line interface for the Shelf-Scrape product-listing
//! scraper.

use clap::Parser;
use shelf_scrape::config::load_config;
use shelf_scrape::scraper::{aggregate_path, build_search_url, run_job};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Scrape: a paginated product-listing scraper
///
/// Shelf-Scrape fetches search-result pages for one or more keywords,
/// parses product listings into structured records, saves raw per-page
/// HTML snapshots, and writes the records to a CSV table for offline
/// analysis.
#[derive(Parser, Debug)]
#[command(name = "shelf-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A paginated product-listing scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Search keyword; may be repeated to run several jobs sequentially
    #[arg(short, long, required = true)]
    keyword: Vec<String>,

    /// Override the configured page limit (0 = full scan)
    #[arg(short, long)]
    pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(pages) = cli.pages {
        config.search.page_limit = pages;
    }

    if cli.dry_run {
        handle_dry_run(&config, &cli.keyword);
        return Ok(());
    }

    // Run each keyword job strictly sequentially
    for keyword in &cli.keyword {
        let outcome = run_job(&config, keyword).await?;
        tracing::info!(
            "Job '{}' done: {} records, {} pages, stop: {:?}",
            keyword,
            outcome.records.len(),
            outcome.pages_fetched,
            outcome.stop_reason
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_scrape=info,warn"),
            1 => EnvFilter::new("shelf_scrape=debug,info"),
            2 => EnvFilter::new("shelf_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &shelf_scrape::config::Config, keywords: &[String]) {
    println!("=== Shelf-Scrape Dry Run ===\n");

    println!("Search:");
    println!("  Base URL: {}", config.search.base_url);
    if config.search.page_limit > 0 {
        println!("  Page limit: {}", config.search.page_limit);
    } else {
        println!("  Page limit: none (full scan)");
    }

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  User agents in pool: {}", config.fetcher.user_agents.len());
    println!("  Accept-Language: {}", config.fetcher.accept_language);

    println!("\nDelay between pages:");
    println!(
        "  {}ms - {}ms",
        config.scraper.delay_min_ms, config.scraper.delay_max_ms
    );

    println!("\nOutput:");
    println!("  Raw snapshots: {}", config.output.raw_dir);
    println!("  Data dir: {}", config.output.data_dir);

    println!("\nJobs ({}):", keywords.len());
    for keyword in keywords {
        println!("  - '{}'", keyword);
        println!("    URL: {}", build_search_url(&config.search.base_url, keyword));
        println!("    CSV: {}", aggregate_path(config, keyword).display());
    }

    println!("\n✓ Configuration is valid");
}
