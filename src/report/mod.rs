//! Report sinks for comparison results.
//!
//! - `json`: persisted `comparison_report.json` and `batch_comparison_report.json`
//! - `text`: summaries printed to stdout
//! - `csv`: flat export with one row per (file, strategy)

pub mod csv;
pub mod json;
pub mod text;

pub use csv::{CSV_HEADERS, CsvExporter};
pub use json::{
    BATCH_REPORT_FILE, BatchEntry, BatchReport, COMPARISON_REPORT_FILE, ComparisonReport,
    ReportConfig,
};
pub use text::{render_batch_summary, render_comparison};
