//! `synth-bench compare`: run every flow on one design, or on a directory.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::analysis::Comparison;
use crate::batch::{FileOutcome, FileRecord, record_key};
use crate::config::SynthConfig;
use crate::core::EnvironmentInfo;
use crate::flow::{FlowContext, run_all};
use crate::process::{ProcessRunner, SystemRunner};
use crate::report::{ComparisonReport, CsvExporter, ReportConfig, render_comparison};
use crate::{SynthError, SynthResult, batch_cmd, write_json};

/// Runs the three flows on single inputs and writes their reports.
pub struct Comparer<'a> {
    runner: &'a dyn ProcessRunner,
    config: &'a SynthConfig,
    environment: Option<EnvironmentInfo>,
}

impl<'a> Comparer<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, config: &'a SynthConfig) -> Self {
        Comparer {
            runner,
            config,
            environment: None,
        }
    }

    /// Attach host and tool information to every report written.
    pub fn with_environment(mut self, env: EnvironmentInfo) -> Self {
        self.environment = Some(env);
        self
    }

    pub fn config(&self) -> &SynthConfig {
        self.config
    }

    pub fn environment(&self) -> Option<&EnvironmentInfo> {
        self.environment.as_ref()
    }

    /// Compare the flows on `input`, writing artifacts and
    /// `comparison_report.json` under `output_dir`.
    ///
    /// Flow failures are recorded in the returned [`Comparison`], not raised.
    ///
    /// # Errors
    /// Returns an error if `input` is missing or not a Verilog/SystemVerilog
    /// file, or if the output directory or report cannot be written.
    pub fn compare(&self, input: &Path, output_dir: &Path) -> SynthResult<Comparison> {
        if !input.is_file() {
            return Err(SynthError::Message(format!(
                "input file does not exist: {}",
                input.display()
            )));
        }
        if !self.config.is_source_file(input) {
            return Err(SynthError::Message(format!(
                "{} is not a Verilog/SystemVerilog file (expected one of: {})",
                input.display(),
                self.config.extensions.join(", ")
            )));
        }

        println!("Starting synthesis comparison for: {}", input.display());
        println!("LUT-K: {}", self.config.lut_k);
        println!("Output directory: {}", output_dir.display());

        let ctx = FlowContext::new(self.runner, self.config, output_dir);
        ctx.prepare()?;
        let comparison = Comparison::new(input, run_all(&ctx, input));
        print!("{}", render_comparison(&comparison));

        let path = self.report(&comparison, output_dir).write_to(output_dir)?;
        println!("\nComparison report saved to: {}", path.display());
        Ok(comparison)
    }

    /// The persisted report for `comparison`.
    pub fn report(&self, comparison: &Comparison, output_dir: &Path) -> ComparisonReport {
        let config = ReportConfig::new(&comparison.input, self.config.lut_k, output_dir);
        let report = ComparisonReport::new(comparison, config);
        match &self.environment {
            Some(env) => report.with_environment(env.clone()),
            None => report,
        }
    }
}

/// Entry point. Returns `Ok(false)` when the run should exit non-zero:
/// every flow failed (single file) or any file failed (directory).
///
/// # Errors
/// Returns an error if `input` does not exist or a report cannot be written.
pub fn run(
    input: PathBuf,
    config: &SynthConfig,
    csv_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
) -> SynthResult<bool> {
    if !input.exists() {
        return Err(SynthError::Message(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    let runner = SystemRunner::new(config.verbose);
    let environment = EnvironmentInfo::detect(&config.tools);
    info!(
        circt = environment.circt_version.as_deref().unwrap_or("unknown"),
        yosys = environment.yosys_version.as_deref().unwrap_or("unknown"),
        "detected tool versions"
    );
    let comparer = Comparer::new(&runner, config).with_environment(environment);

    if input.is_dir() {
        return batch_cmd::run(&comparer, &input, csv_out, json_out);
    }

    let comparison = comparer.compare(&input, &config.output_dir)?;
    let any_succeeded = !comparison.all_failed();

    if let Some(path) = json_out {
        write_json(&path, &comparer.report(&comparison, &config.output_dir))?;
        info!(path = %path.display(), "wrote JSON report");
    }
    if let Some(path) = csv_out {
        let record = FileRecord {
            key: record_key(input.parent().unwrap_or(Path::new("")), &input),
            file_path: input.clone(),
            outcome: FileOutcome::Compared(comparison),
        };
        CsvExporter::new().export(std::slice::from_ref(&record), &path)?;
        info!(path = %path.display(), "wrote CSV export");
    }

    Ok(any_succeeded)
}
