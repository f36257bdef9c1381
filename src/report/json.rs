//! Persisted JSON report schemas.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, Comparison};
use crate::batch::{BatchRun, BatchSummary, FileOutcome, FileRecord, OverallSpeedup};
use crate::config::SynthConfig;
use crate::core::{EnvironmentInfo, FlowResult, Strategy};
use crate::{SynthResult, now_string, sha256_hex, write_json};

pub const COMPARISON_REPORT_FILE: &str = "comparison_report.json";
pub const BATCH_REPORT_FILE: &str = "batch_comparison_report.json";

/// Run parameters recorded with each report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub input_file: String,
    pub lut_k: u32,
    pub output_dir: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
}

impl ReportConfig {
    pub fn new(input: &Path, lut_k: u32, output_dir: &Path) -> Self {
        ReportConfig {
            input_file: input.display().to_string(),
            lut_k,
            output_dir: output_dir.display().to_string(),
            timestamp: now_string(),
            input_sha256: std::fs::read(input).ok().map(|b| sha256_hex(&b)),
        }
    }
}

/// `comparison_report.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub circt: Option<FlowResult>,
    pub yosys: Option<FlowResult>,
    pub hybrid: Option<FlowResult>,
    pub analysis: Analysis,
    pub config: ReportConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentInfo>,
}

impl ComparisonReport {
    pub fn new(comparison: &Comparison, config: ReportConfig) -> Self {
        let result = |s: Strategy| comparison.results.get(&s).cloned();
        ComparisonReport {
            circt: result(Strategy::Circt),
            yosys: result(Strategy::Yosys),
            hybrid: result(Strategy::Hybrid),
            analysis: comparison.analysis.clone(),
            config,
            environment: None,
        }
    }

    pub fn with_environment(mut self, env: EnvironmentInfo) -> Self {
        self.environment = Some(env);
        self
    }

    /// Write to `<dir>/comparison_report.json`, returning the path.
    pub fn write_to(&self, dir: &Path) -> SynthResult<PathBuf> {
        let path = dir.join(COMPARISON_REPORT_FILE);
        write_json(&path, self)?;
        Ok(path)
    }
}

/// Per-file record in the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Compared {
        file_path: String,
        circt: Option<FlowResult>,
        yosys: Option<FlowResult>,
        hybrid: Option<FlowResult>,
        analysis: Analysis,
    },
    Failed {
        file_path: String,
        error: String,
    },
}

impl From<&FileRecord> for BatchEntry {
    fn from(record: &FileRecord) -> Self {
        let file_path = record.file_path.display().to_string();
        match &record.outcome {
            FileOutcome::Compared(c) => {
                let result = |s: Strategy| c.results.get(&s).cloned();
                BatchEntry::Compared {
                    file_path,
                    circt: result(Strategy::Circt),
                    yosys: result(Strategy::Yosys),
                    hybrid: result(Strategy::Hybrid),
                    analysis: c.analysis.clone(),
                }
            }
            FileOutcome::Failed { error } => BatchEntry::Failed {
                file_path,
                error: error.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummaryReport {
    #[serde(flatten)]
    pub summary: BatchSummary,
    pub overall_speedup: Option<OverallSpeedup>,
}

/// `batch_comparison_report.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub input_path: String,
    pub total_files: usize,
    pub results: BTreeMap<String, BatchEntry>,
    pub summary: BatchSummaryReport,
    pub lut_k: u32,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentInfo>,
}

impl BatchReport {
    pub fn new(input_path: &Path, run: &BatchRun, config: &SynthConfig) -> Self {
        BatchReport {
            input_path: input_path.display().to_string(),
            total_files: run.total_files(),
            results: run
                .records
                .iter()
                .map(|r| (r.key.clone(), BatchEntry::from(r)))
                .collect(),
            summary: BatchSummaryReport {
                summary: run.summary.clone(),
                overall_speedup: run.summary.overall_speedup(),
            },
            lut_k: config.lut_k,
            timestamp: now_string(),
            environment: None,
        }
    }

    pub fn with_environment(mut self, env: EnvironmentInfo) -> Self {
        self.environment = Some(env);
        self
    }

    /// Write to `<dir>/batch_comparison_report.json`, returning the path.
    pub fn write_to(&self, dir: &Path) -> SynthResult<PathBuf> {
        let path = dir.join(BATCH_REPORT_FILE);
        write_json(&path, self)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::run_batch;
    use crate::core::FlowMetrics;
    use crate::SynthError;
    use std::time::Duration;

    fn sample_comparison(input: &Path) -> Comparison {
        let ok = |d, l, s| {
            FlowResult::success(
                FlowMetrics { logic_depth: Some(d), cell_count: Some(l) },
                Duration::from_secs_f64(s),
            )
        };
        Comparison::new(
            input,
            [
                (Strategy::Circt, ok(3, 10, 0.5)),
                (Strategy::Yosys, ok(4, 9, 1.0)),
                (Strategy::Hybrid, FlowResult::failure("circt-synth failed: x", None)),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn test_comparison_report_schema() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("top.sv");
        std::fs::write(&input, "module top; endmodule\n").unwrap();

        let report = ComparisonReport::new(
            &sample_comparison(&input),
            ReportConfig::new(&input, 6, dir.path()),
        );
        let path = report.write_to(dir.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        for key in ["circt", "yosys", "hybrid", "analysis", "config"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        let circt = &value["circt"];
        assert_eq!(circt["timing_levels"], 3);
        assert_eq!(circt["lut_count"], 10);
        assert_eq!(circt["success"], true);
        assert!(circt["error_message"].is_null());
        assert_eq!(value["hybrid"]["success"], false);
        assert!(value["hybrid"]["timing_levels"].is_null());
        assert_eq!(value["config"]["lut_k"], 6);
        assert_eq!(
            value["config"]["input_sha256"].as_str().unwrap().len(),
            64
        );
        assert_eq!(value["analysis"]["area"]["winner"], "yosys");
    }

    #[test]
    fn test_batch_report_schema() {
        let root = Path::new("rtl");
        let inputs = vec![root.join("a.sv"), root.join("b.sv")];
        let run = run_batch(root, &inputs, |p| {
            if p.ends_with("b.sv") {
                Err(SynthError::Message("boom".into()))
            } else {
                Ok(sample_comparison(p))
            }
        });
        let report = BatchReport::new(root, &run, &SynthConfig::default());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["input_path"], "rtl");
        assert_eq!(value["total_files"], 2);
        assert_eq!(value["results"]["b.sv"]["error"], "boom");
        assert!(value["results"]["a.sv"]["analysis"].is_object());
        assert_eq!(value["summary"]["failed_comparisons"], 2);
        assert_eq!(value["summary"]["successful_comparisons"], 0);
    }
}
