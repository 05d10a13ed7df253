//! Persistence sink trait and output path conventions

use crate::record::ProductRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for persistence sinks
///
/// A sink receives the two kinds of output a run produces: raw per-page
/// snapshots (written as pages arrive, best-effort) and the final aggregate
/// record table (written once at end of run).
pub trait RecordSink {
    /// Writes the raw page body to a uniquely named snapshot file
    ///
    /// The file is keyed by keyword and page number; writing the same page
    /// twice overwrites the previous snapshot.
    ///
    /// # Arguments
    ///
    /// * `keyword` - The search keyword of the run
    /// * `page_number` - The 1-based page number
    /// * `html` - The verbatim response body
    ///
    /// # Returns
    ///
    /// The path the snapshot was written to
    fn save_snapshot(&self, keyword: &str, page_number: u32, html: &str)
        -> OutputResult<PathBuf>;

    /// Writes the full accumulated record sequence to a tabular file
    ///
    /// An empty input sequence is a no-op with a warning, not an error.
    ///
    /// # Arguments
    ///
    /// * `records` - The accumulated records, in scrape order
    /// * `path` - Destination path for the table
    fn save_records(&self, records: &[ProductRecord], path: &Path) -> OutputResult<()>;
}

/// Builds the snapshot file name for a keyword and page number
///
/// Spaces in the keyword become underscores: keyword "rtx 5090" page 2
/// yields `Raw_rtx_5090_p_2.html`.
pub fn snapshot_filename(keyword: &str, page_number: u32) -> String {
    format!("Raw_{}_p_{}.html", keyword.replace(' ', "_"), page_number)
}

/// Builds the aggregate table file name for an output base and page limit
///
/// Output base "gpu" with page limit 3 yields `Raw_gpu_p3.csv`; a full
/// scan (limit 0) yields `Raw_gpu_p0.csv`.
pub fn aggregate_filename(output_base: &str, page_limit: u32) -> String {
    format!("Raw_{}_p{}.csv", output_base, page_limit)
}
