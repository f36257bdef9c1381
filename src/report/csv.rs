//! CSV export of comparison results, one row per (file, strategy).

use std::io::Write;
use std::path::Path;

use crate::batch::{FileOutcome, FileRecord};
use crate::core::FlowResult;
use crate::{SynthError, SynthResult};

/// CSV column headers in deterministic order.
pub const CSV_HEADERS: &[&str] = &[
    "file",
    "strategy",
    "success",
    "timing_levels",
    "lut_count",
    "runtime_s",
    "timing_winner",
    "area_winner",
    "runtime_winner",
    "error_message",
];

/// Flat CSV exporter for [`FileRecord`]s.
///
/// A compared file yields one row per strategy that ran. A file that could not
/// be compared yields a single row with an empty strategy and its error.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        CsvExporter
    }

    /// Export records to a CSV file, creating parent directories.
    ///
    /// # Arguments
    /// * `records` - Batch or single-file records to export
    /// * `output` - Path to the output CSV file
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or CSV writing fails.
    pub fn export(&self, records: &[FileRecord], output: &Path) -> SynthResult<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SynthError::io(format!("failed to create {}", parent.display()), e))?;
            }
        }
        let file = std::fs::File::create(output)
            .map_err(|e| SynthError::io(format!("failed to create {}", output.display()), e))?;
        self.export_to_writer(records, file)
    }

    /// Export records to any writer.
    ///
    /// # Errors
    /// Returns an error if CSV writing fails.
    pub fn export_to_writer<W: Write>(&self, records: &[FileRecord], writer: W) -> SynthResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(CSV_HEADERS)
            .map_err(|e| SynthError::Message(format!("failed to write CSV headers: {e}")))?;

        for row in records.iter().flat_map(|r| self.record_rows(r)) {
            csv_writer
                .write_record(&row)
                .map_err(|e| SynthError::Message(format!("failed to write CSV row: {e}")))?;
        }

        csv_writer
            .flush()
            .map_err(|e| SynthError::io("failed to flush CSV writer", e))?;
        Ok(())
    }

    fn record_rows(&self, record: &FileRecord) -> Vec<Vec<String>> {
        match &record.outcome {
            FileOutcome::Compared(c) => {
                let winners = [
                    c.analysis.timing.winner_label(),
                    c.analysis.area.winner_label(),
                    c.analysis.runtime.winner_label(),
                ];
                c.results
                    .iter()
                    .map(|(strategy, result)| {
                        let mut row = vec![record.key.clone(), strategy.key().to_string()];
                        row.extend(Self::result_cells(result));
                        row.extend(winners.iter().map(|w| w.to_string()));
                        row.push(result.failure_reason.clone().unwrap_or_default());
                        row
                    })
                    .collect()
            }
            FileOutcome::Failed { error } => {
                let mut row = vec![record.key.clone(), String::new(), "false".to_string()];
                row.extend(std::iter::repeat_n(String::new(), CSV_HEADERS.len() - 4));
                row.push(error.clone());
                vec![row]
            }
        }
    }

    fn result_cells(result: &FlowResult) -> [String; 4] {
        [
            result.succeeded.to_string(),
            result.logic_depth.map(|v| v.to_string()).unwrap_or_default(),
            result.cell_count.map(|v| v.to_string()).unwrap_or_default(),
            result
                .runtime_seconds
                .map(|v| format!("{v:.3}"))
                .unwrap_or_default(),
        ]
    }
}
