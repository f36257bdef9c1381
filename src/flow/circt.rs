//! Native CIRCT flow: circt-verilog -> circt-synth with LUT mapping.

use std::path::Path;

use tracing::warn;

use crate::core::{FlowMetrics, Strategy};
use crate::metrics::read_longest_path;
use crate::process::CommandSpec;

use super::{Flow, FlowContext, FlowError, StageSequence, file_stem, remove_stale};

pub struct CirctFlow;

impl Flow for CirctFlow {
    fn strategy(&self) -> Strategy {
        Strategy::Circt
    }

    fn execute(
        &self,
        ctx: &FlowContext<'_>,
        seq: &mut StageSequence<'_>,
        input: &Path,
    ) -> Result<FlowMetrics, FlowError> {
        let stem = file_stem(input);
        let mlir = ctx.circt_dir.join(format!("{stem}.mlir"));
        let synth = ctx.circt_dir.join(format!("{stem}.synth.mlir"));
        let report = ctx.circt_dir.join(format!("{stem}.longest_path.json"));
        remove_stale(&[&report]);

        let import = CommandSpec::new(&ctx.tools.circt_verilog)
            .path_arg(input)
            .arg("-o")
            .path_arg(&mlir)
            .arg("--mlir-timing");
        seq.run("circt-verilog", &import)?;

        let synthesize = CommandSpec::new(&ctx.tools.circt_synth)
            .path_arg(&mlir)
            .arg(format!("--lower-to-k-lut={}", ctx.lut_k))
            .arg("--output-longest-path-top-k-percent=0")
            .arg(format!("--output-longest-path={}", report.display()))
            .arg("--output-longest-path-json")
            .arg("-o")
            .path_arg(&synth)
            .arg("--mlir-timing");
        seq.run("circt-synth", &synthesize)?;

        if !report.exists() {
            warn!(path = %report.display(), "longest-path report not generated");
        }
        Ok(read_longest_path(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use crate::process::{ProcessOutput, ScriptedRunner};

    fn report_arg(args: &[String]) -> Option<String> {
        args.iter()
            .find_map(|a| a.strip_prefix("--output-longest-path=").map(str::to_string))
    }

    #[test]
    fn test_circt_flow_success_parses_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = SynthConfig::default().with_lut_k(4);
        let runner = ScriptedRunner::new()
            .succeed("circt-verilog", "")
            .on("circt-synth", |cmd| {
                if let Some(path) = report_arg(&cmd.args) {
                    std::fs::write(
                        path,
                        r#"[{"timing_levels":[{"level":2,"count":5,"percentage":50},{"level":4,"count":10,"percentage":100}]}]"#,
                    )
                    .unwrap();
                }
                ProcessOutput::ok("")
            });
        let ctx = FlowContext::new(&runner, &config, dir.path());
        ctx.prepare().unwrap();

        let result = CirctFlow.run(&ctx, Path::new("rtl/adder.sv"));

        assert!(result.succeeded, "{:?}", result.failure_reason);
        assert_eq!(result.logic_depth, Some(4));
        assert_eq!(result.cell_count, Some(10));
        assert!(result.runtime_seconds.is_some());

        let synth_args = &runner.invocations()[1].args;
        assert!(synth_args.contains(&"--lower-to-k-lut=4".to_string()));
        assert!(ctx.circt_dir.join("adder.circt.transcript.log").exists());
    }

    #[test]
    fn test_circt_flow_missing_report_is_degraded_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = SynthConfig::default();
        let runner = ScriptedRunner::new()
            .succeed("circt-verilog", "")
            .succeed("circt-synth", "");
        let ctx = FlowContext::new(&runner, &config, dir.path());
        ctx.prepare().unwrap();

        let result = CirctFlow.run(&ctx, Path::new("top.sv"));

        assert!(result.succeeded);
        assert!(result.logic_depth.is_none());
        assert!(result.cell_count.is_none());
    }

    #[test]
    fn test_circt_flow_front_end_failure_skips_synth() {
        let dir = tempfile::tempdir().unwrap();
        let config = SynthConfig::default();
        let runner = ScriptedRunner::new()
            .fail("circt-verilog", 1, "top.sv:3:1: error: expected ';'")
            .succeed("circt-synth", "");
        let ctx = FlowContext::new(&runner, &config, dir.path());
        ctx.prepare().unwrap();

        let result = CirctFlow.run(&ctx, Path::new("top.sv"));

        assert!(!result.succeeded);
        assert_eq!(runner.invocation_count(), 1);
        assert_eq!(
            result.failure_reason.as_deref(),
            Some("circt-verilog failed: top.sv:3:1: error: expected ';'")
        );
        assert!(result.runtime_seconds.is_some());
        assert!(result.logic_depth.is_none());
    }
}
