//! Per-file isolation and the batch summary fold.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SynthResult;
use crate::analysis::{Comparison, MetricRanking};
use crate::core::Strategy;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Compared(Comparison),
    Failed { error: String },
}

/// One entry of a batch, keyed by its path relative to the batch root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub key: String,
    pub file_path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileRecord {
    pub fn comparison(&self) -> Option<&Comparison> {
        match &self.outcome {
            FileOutcome::Compared(c) => Some(c),
            FileOutcome::Failed { .. } => None,
        }
    }

    /// Compared, and every strategy succeeded.
    pub fn is_success(&self) -> bool {
        self.comparison().is_some_and(Comparison::all_succeeded)
    }
}

/// Wins per strategy and exact ties for one metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    pub wins: BTreeMap<Strategy, usize>,
    pub ties: usize,
}

impl WinTally {
    fn record<T>(mut self, ranking: &MetricRanking<T>) -> Self {
        match ranking.winner {
            Some(_) if ranking.tied => self.ties += 1,
            Some(winner) => *self.wins.entry(winner).or_insert(0) += 1,
            None => {}
        }
        self
    }

    pub fn wins_for(&self, strategy: Strategy) -> usize {
        self.wins.get(&strategy).copied().unwrap_or(0)
    }
}

/// Fastest versus slowest total runtime across the batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallSpeedup {
    pub fastest: Strategy,
    pub slowest: Strategy,
    pub ratio: f64,
}

/// Aggregate of a batch, built by folding [`FileRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub successful_comparisons: usize,
    pub failed_comparisons: usize,
    pub timing: WinTally,
    pub area: WinTally,
    pub runtime: WinTally,
    /// Seconds per strategy, over successful comparisons only
    pub total_runtime: BTreeMap<Strategy, f64>,
}

impl BatchSummary {
    /// Fold one record into the summary.
    pub fn absorb(mut self, record: &FileRecord) -> Self {
        let Some(comparison) = record.comparison().filter(|c| c.all_succeeded()) else {
            self.failed_comparisons += 1;
            return self;
        };
        self.successful_comparisons += 1;
        let analysis = &comparison.analysis;
        self.timing = self.timing.record(&analysis.timing);
        self.area = self.area.record(&analysis.area);
        self.runtime = self.runtime.record(&analysis.runtime);
        for (strategy, result) in &comparison.results {
            if let Some(secs) = result.runtime_seconds {
                *self.total_runtime.entry(*strategy).or_insert(0.0) += secs;
            }
        }
        self
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Self {
        records.into_iter().fold(BatchSummary::default(), BatchSummary::absorb)
    }

    /// Ratio of the largest to the smallest positive runtime total.
    pub fn overall_speedup(&self) -> Option<OverallSpeedup> {
        let positive = || self.total_runtime.iter().filter(|(_, t)| **t > 0.0);
        let (fastest, fast) = positive().min_by(|a, b| a.1.total_cmp(b.1))?;
        let (slowest, slow) = positive().max_by(|a, b| a.1.total_cmp(b.1))?;
        if fastest == slowest {
            return None;
        }
        Some(OverallSpeedup {
            fastest: *fastest,
            slowest: *slowest,
            ratio: slow / fast,
        })
    }
}

/// Records in input order plus their summary.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub records: Vec<FileRecord>,
    pub summary: BatchSummary,
}

impl BatchRun {
    pub fn total_files(&self) -> usize {
        self.records.len()
    }

    pub fn any_failed(&self) -> bool {
        self.summary.failed_comparisons > 0
    }
}

/// Key for a file: its path relative to `root`, or the path itself.
pub fn record_key(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).ok().filter(|p| !p.as_os_str().is_empty());
    rel.unwrap_or(file).to_string_lossy().replace('\\', "/")
}

/// Run `compare` over every input, one at a time.
///
/// An error or panic while processing one file becomes a failed record for
/// that file; the remaining files are still processed.
pub fn run_batch<F>(root: &Path, inputs: &[PathBuf], mut compare: F) -> BatchRun
where
    F: FnMut(&Path) -> SynthResult<Comparison>,
{
    let total = inputs.len();
    let mut records = Vec::with_capacity(total);

    for (i, input) in inputs.iter().enumerate() {
        let key = record_key(root, input);
        println!("\n[{}/{}] Processing: {}", i + 1, total, key);
        println!("{}", "-".repeat(60));

        let outcome = match catch_unwind(AssertUnwindSafe(|| compare(input))) {
            Ok(Ok(comparison)) => FileOutcome::Compared(comparison),
            Ok(Err(e)) => {
                warn!(file = %key, error = %e, "comparison failed");
                FileOutcome::Failed { error: e.to_string() }
            }
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                warn!(file = %key, %message, "comparison panicked");
                FileOutcome::Failed { error: format!("panic: {message}") }
            }
        };
        records.push(FileRecord {
            key,
            file_path: input.clone(),
            outcome,
        });
    }

    let summary = BatchSummary::from_records(&records);
    info!(
        total,
        succeeded = summary.successful_comparisons,
        failed = summary.failed_comparisons,
        "batch finished"
    );
    BatchRun { records, summary }
}
