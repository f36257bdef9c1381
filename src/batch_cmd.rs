//! Directory mode of `synth-bench compare`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::batch::{BatchRun, discover_inputs, record_key, run_batch};
use crate::compare_cmd::Comparer;
use crate::report::{BatchReport, CsvExporter, render_batch_summary};
use crate::{SynthError, SynthResult, write_json};

/// Artifact directory for one batch file: its relative path, extension
/// included, so `top.sv` and `top.v` in one directory stay apart.
pub fn file_output_dir(output_root: &Path, batch_root: &Path, file: &Path) -> PathBuf {
    output_root.join(record_key(batch_root, file))
}

/// Compare every design under `root`, writing each file's artifacts and
/// report under its own directory in the configured output root.
///
/// # Errors
/// Returns an error if `root` cannot be walked or holds no design files.
/// Per-file failures are recorded in the returned [`BatchRun`].
pub fn compare_all(comparer: &Comparer<'_>, root: &Path) -> SynthResult<BatchRun> {
    let config = comparer.config();
    let inputs = discover_inputs(root, config)?;
    if inputs.is_empty() {
        return Err(SynthError::Message(format!(
            "no Verilog files found in {}",
            root.display()
        )));
    }

    println!("Starting batch synthesis comparison for {} files", inputs.len());
    println!("LUT-K: {}", config.lut_k);
    println!("Output directory: {}", config.output_dir.display());
    println!("{}", "=".repeat(80));

    let run = run_batch(root, &inputs, |file| {
        comparer.compare(file, &file_output_dir(&config.output_dir, root, file))
    });
    print!("{}", render_batch_summary(&run));
    Ok(run)
}

/// Batch entry point. Returns `Ok(false)` when any file failed.
///
/// # Errors
/// Returns an error if discovery fails or a report cannot be written.
pub fn run(
    comparer: &Comparer<'_>,
    root: &Path,
    csv_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
) -> SynthResult<bool> {
    let run = compare_all(comparer, root)?;
    let config = comparer.config();

    let mut report = BatchReport::new(root, &run, config);
    if let Some(env) = comparer.environment() {
        report = report.with_environment(env.clone());
    }
    let path = report.write_to(&config.output_dir)?;
    println!("\nBatch comparison report saved to: {}", path.display());

    if let Some(path) = json_out {
        write_json(&path, &report)?;
        info!(path = %path.display(), "wrote JSON report");
    }
    if let Some(path) = csv_out {
        CsvExporter::new().export(&run.records, &path)?;
        info!(path = %path.display(), "wrote CSV export");
    }

    Ok(!run.any_failed())
}
