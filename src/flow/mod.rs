//! Synthesis flows.
//!
//! # Architecture
//!
//! - **Flow**: one synthesis strategy, a fixed sequence of tool stages.
//!   `CirctFlow` (native), `YosysFlow` (external) and `HybridFlow` (CIRCT
//!   front end, Yosys/ABC back end).
//! - **StageSequence**: runs stages through a [`ProcessRunner`], stops at the
//!   first non-zero exit, times the whole flow and writes the transcript.
//!
//! A flow never returns an error. Every stage failure, launch fault or I/O
//! problem becomes a failed [`FlowResult`] carrying the elapsed time.

pub mod circt;
pub mod hybrid;
pub mod scripts;
pub mod stage;
pub mod transcript;
pub mod yosys;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{SynthConfig, ToolPaths};
use crate::core::{FlowMetrics, FlowResult, Strategy};
use crate::process::ProcessRunner;
use crate::{SynthError, SynthResult};

pub use circt::CirctFlow;
pub use hybrid::HybridFlow;
pub use stage::{FlowError, StageFailure, StageSequence};
pub use yosys::YosysFlow;

/// Shared inputs for every flow run against one output directory.
pub struct FlowContext<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub tools: &'a ToolPaths,
    /// LUT input count
    pub lut_k: u32,
    /// Artifacts written by CIRCT stages
    pub circt_dir: PathBuf,
    /// Artifacts written by Yosys stages
    pub yosys_dir: PathBuf,
}

impl<'a> FlowContext<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, config: &'a SynthConfig, output_dir: &Path) -> Self {
        FlowContext {
            runner,
            tools: &config.tools,
            lut_k: config.lut_k,
            circt_dir: output_dir.join("circt"),
            yosys_dir: output_dir.join("yosys-abc"),
        }
    }

    /// Create the artifact directories.
    pub fn prepare(&self) -> SynthResult<()> {
        for dir in [&self.circt_dir, &self.yosys_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| SynthError::io(format!("failed to create {}", dir.display()), e))?;
        }
        Ok(())
    }

    /// Transcript location for a strategy.
    pub fn transcript_path(&self, strategy: Strategy, stem: &str) -> PathBuf {
        let dir = match strategy {
            Strategy::Circt => &self.circt_dir,
            Strategy::Yosys | Strategy::Hybrid => &self.yosys_dir,
        };
        dir.join(format!("{stem}.{}.transcript.log", strategy.key()))
    }
}

/// One synthesis strategy.
pub trait Flow: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Run the stages in order, returning the extracted metrics.
    ///
    /// Returns at the first failing stage.
    fn execute(
        &self,
        ctx: &FlowContext<'_>,
        seq: &mut StageSequence<'_>,
        input: &Path,
    ) -> Result<FlowMetrics, FlowError>;

    /// Run the flow end to end. Never fails; failures are recorded in the result.
    fn run(&self, ctx: &FlowContext<'_>, input: &Path) -> FlowResult {
        let strategy = self.strategy();
        let stem = file_stem(input);
        let mut seq = StageSequence::start(ctx.runner, ctx.transcript_path(strategy, &stem));

        match self.execute(ctx, &mut seq, input) {
            Ok(metrics) => {
                let elapsed = seq.elapsed();
                info!(
                    flow = %strategy,
                    depth = ?metrics.logic_depth,
                    luts = ?metrics.cell_count,
                    runtime_s = elapsed.as_secs_f64(),
                    "flow completed"
                );
                FlowResult::success(metrics, elapsed)
            }
            Err(e) => {
                let elapsed = seq.elapsed();
                warn!(
                    flow = %strategy,
                    stages = seq.stages_run(),
                    transcript = %seq.transcript_path().display(),
                    error = %e,
                    "flow failed"
                );
                FlowResult::failure(e.to_string(), Some(elapsed))
            }
        }
    }
}

/// The three strategies in priority order.
pub fn all_flows() -> [&'static dyn Flow; 3] {
    [&CirctFlow, &YosysFlow, &HybridFlow]
}

/// Run every flow on `input` one after another.
pub fn run_all(ctx: &FlowContext<'_>, input: &Path) -> BTreeMap<Strategy, FlowResult> {
    all_flows()
        .into_iter()
        .map(|flow| {
            println!("\n{}", "=".repeat(50));
            println!("RUNNING {} SYNTHESIS FLOW", flow.strategy().display_name().to_uppercase());
            println!("{}", "=".repeat(50));
            (flow.strategy(), flow.run(ctx, input))
        })
        .collect()
}

/// File stem used to name artifacts.
pub fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "design".to_string())
}

/// Remove outputs left by a previous run so they are never parsed as fresh.
pub(crate) fn remove_stale(paths: &[&Path]) {
    for p in paths {
        if p.exists() {
            if let Err(e) = std::fs::remove_file(p) {
                warn!(path = %p.display(), error = %e, "failed to remove stale artifact");
            }
        }
    }
}
