//! Hybrid flow: CIRCT front end, AIGER export, Yosys/ABC LUT mapping.

use std::path::Path;

use crate::core::{FlowMetrics, Strategy};
use crate::metrics::{read_abc_levels, read_blif_lut_count};
use crate::process::CommandSpec;

use super::scripts::{hybrid_script, write_script};
use super::{Flow, FlowContext, FlowError, StageSequence, file_stem, remove_stale};

pub struct HybridFlow;

impl Flow for HybridFlow {
    fn strategy(&self) -> Strategy {
        Strategy::Hybrid
    }

    fn execute(
        &self,
        ctx: &FlowContext<'_>,
        seq: &mut StageSequence<'_>,
        input: &Path,
    ) -> Result<FlowMetrics, FlowError> {
        let stem = file_stem(input);
        let mlir = ctx.circt_dir.join(format!("{stem}.hybrid.mlir"));
        let synth = ctx.circt_dir.join(format!("{stem}.hybrid.synth.mlir"));
        let aig = ctx.circt_dir.join(format!("{stem}.hybrid.aig"));
        let blif = ctx.yosys_dir.join(format!("{stem}.hybrid.blif"));
        let log = ctx.yosys_dir.join(format!("{stem}.hybrid.log"));
        remove_stale(&[&blif, &log]);

        let import = CommandSpec::new(&ctx.tools.circt_verilog)
            .path_arg(input)
            .arg("-o")
            .path_arg(&mlir)
            .arg("--mlir-timing");
        seq.run("circt-verilog", &import)?;

        // No LUT mapping here: the back end is ABC
        let synthesize = CommandSpec::new(&ctx.tools.circt_synth)
            .path_arg(&mlir)
            .arg("-o")
            .path_arg(&synth)
            .arg("--mlir-timing");
        seq.run("circt-synth", &synthesize)?;

        let export = CommandSpec::new(&ctx.tools.circt_translate)
            .path_arg(&synth)
            .arg("--export-aiger")
            .arg("-o")
            .path_arg(&aig);
        seq.run("circt-translate AIGER export", &export)?;

        let script = write_script(&hybrid_script(&aig, &blif, ctx.lut_k))
            .map_err(|e| FlowError::io("failed to write yosys script", e))?;
        let map = CommandSpec::new(&ctx.tools.yosys).arg("-s").path_arg(script.path());
        seq.run_logged("Yosys LUT mapping", &map, &log)?;

        Ok(FlowMetrics {
            logic_depth: read_abc_levels(&log),
            cell_count: read_blif_lut_count(&blif),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use crate::process::ScriptedRunner;

    #[test]
    fn test_hybrid_stage_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = SynthConfig::default();
        let runner = ScriptedRunner::new()
            .succeed("circt-verilog", "")
            .succeed("circt-synth", "")
            .succeed("circt-translate", "")
            .succeed("yosys", "ABC: netlist : i/o = 2/1 lat = 0 nd = 1 lev = 1\n");
        let ctx = FlowContext::new(&runner, &config, dir.path());
        ctx.prepare().unwrap();

        let result = HybridFlow.run(&ctx, Path::new("mux.sv"));

        assert!(result.succeeded);
        assert_eq!(
            runner.programs(),
            vec!["circt-verilog", "circt-synth", "circt-translate", "yosys"]
        );
        // circt-synth must not map to LUTs in the hybrid flow
        let synth_args = &runner.invocations()[1].args;
        assert!(!synth_args.iter().any(|a| a.starts_with("--lower-to-k-lut")));
        assert_eq!(result.logic_depth, Some(1));
        // no BLIF written by the scripted yosys
        assert_eq!(result.cell_count, None);
    }

    #[test]
    fn test_hybrid_export_failure_stops_before_yosys() {
        let dir = tempfile::tempdir().unwrap();
        let config = SynthConfig::default();
        let runner = ScriptedRunner::new()
            .succeed("circt-verilog", "")
            .succeed("circt-synth", "")
            .fail("circt-translate", 1, "error: unsupported operation")
            .succeed("yosys", "");
        let ctx = FlowContext::new(&runner, &config, dir.path());
        ctx.prepare().unwrap();

        let result = HybridFlow.run(&ctx, Path::new("mux.sv"));

        assert!(!result.succeeded);
        assert_eq!(runner.invocation_count(), 3);
        assert_eq!(
            result.failure_reason.as_deref(),
            Some("circt-translate AIGER export failed: error: unsupported operation")
        );
    }
}
