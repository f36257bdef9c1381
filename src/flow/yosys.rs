//! Yosys+ABC flow: a single Yosys run reading RTL and mapping to LUTs.

use std::path::Path;

use crate::core::{FlowMetrics, Strategy};
use crate::metrics::{read_abc_levels, read_blif_lut_count};
use crate::process::CommandSpec;

use super::scripts::{write_script, yosys_flow_script};
use super::{Flow, FlowContext, FlowError, StageSequence, file_stem, remove_stale};

pub struct YosysFlow;

impl Flow for YosysFlow {
    fn strategy(&self) -> Strategy {
        Strategy::Yosys
    }

    fn execute(
        &self,
        ctx: &FlowContext<'_>,
        seq: &mut StageSequence<'_>,
        input: &Path,
    ) -> Result<FlowMetrics, FlowError> {
        let stem = file_stem(input);
        let blif = ctx.yosys_dir.join(format!("{stem}.blif"));
        let log = ctx.yosys_dir.join(format!("{stem}.yosys.log"));
        remove_stale(&[&blif, &log]);

        // Deleted when `script` drops, whichever way this returns
        let script = write_script(&yosys_flow_script(input, &blif, ctx.lut_k))
            .map_err(|e| FlowError::io("failed to write yosys script", e))?;

        let cmd = CommandSpec::new(&ctx.tools.yosys).arg("-s").path_arg(script.path());
        seq.run_logged("Yosys", &cmd, &log)?;

        Ok(FlowMetrics {
            logic_depth: read_abc_levels(&log),
            cell_count: read_blif_lut_count(&blif),
        })
    }
}
