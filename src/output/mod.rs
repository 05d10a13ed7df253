//! Output module for raw page snapshots and the aggregate CSV table
//!
//! This module handles:
//! - Persisting the verbatim HTML body of each fetched page
//! - Writing the accumulated product records to a CSV file
//! - Constructing the stable output file names downstream tools expect

mod csv_sink;
mod sink;

pub use csv_sink::CsvSink;
pub use sink::{aggregate_filename, snapshot_filename, OutputError, OutputResult, RecordSink};
