//! Filesystem-backed sink: HTML snapshot files plus a CSV aggregate table

use crate::output::sink::{snapshot_filename, OutputResult, RecordSink};
use crate::record::ProductRecord;
use std::path::{Path, PathBuf};

/// Sink that writes snapshots under a raw directory and records as CSV
///
/// The raw directory is created eagerly so that mid-run snapshot writes
/// only fail for real IO reasons, not a missing parent.
pub struct CsvSink {
    raw_dir: PathBuf,
}

impl CsvSink {
    /// Creates a sink rooted at the given raw snapshot directory
    ///
    /// # Arguments
    ///
    /// * `raw_dir` - Directory for per-page HTML snapshots; created if absent
    pub fn new(raw_dir: impl Into<PathBuf>) -> OutputResult<Self> {
        let raw_dir = raw_dir.into();
        std::fs::create_dir_all(&raw_dir)?;
        Ok(Self { raw_dir })
    }

    /// Returns the snapshot path for a keyword and page number
    pub fn snapshot_path(&self, keyword: &str, page_number: u32) -> PathBuf {
        self.raw_dir.join(snapshot_filename(keyword, page_number))
    }
}

impl RecordSink for CsvSink {
    fn save_snapshot(
        &self,
        keyword: &str,
        page_number: u32,
        html: &str,
    ) -> OutputResult<PathBuf> {
        let path = self.snapshot_path(keyword, page_number);
        std::fs::write(&path, html)?;
        Ok(path)
    }

    fn save_records(&self, records: &[ProductRecord], path: &Path) -> OutputResult<()> {
        if records.is_empty() {
            tracing::warn!("Record list is empty, skipping CSV save");
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Header row comes from the ProductRecord field order
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}
