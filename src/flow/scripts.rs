//! Yosys script generation.
//!
//! Scripts are written to named temporary files that are deleted when the
//! returned handle drops, on success and failure paths alike.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Quote a path for a Yosys script when it contains whitespace.
fn ys_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if s.chars().any(char::is_whitespace) {
        format!("\"{s}\"")
    } else {
        s.into_owned()
    }
}

/// Script for the Yosys+ABC flow: read RTL, synthesize, map to K-LUTs.
pub fn yosys_flow_script(input: &Path, blif: &Path, lut_k: u32) -> String {
    format!(
        "# Yosys synthesis script for {input}\n\
         read_verilog -sv {input}\n\
         hierarchy -auto-top\n\
         synth\n\
         abc -script +if,-K,{lut_k};,print_stats\n\
         write_blif {blif}\n",
        input = ys_path(input),
        blif = ys_path(blif),
    )
}

/// Script for the hybrid flow: read CIRCT's AIGER export, map to K-LUTs.
pub fn hybrid_script(aig: &Path, blif: &Path, lut_k: u32) -> String {
    format!(
        "# Hybrid Yosys script for CIRCT AIGER input: {aig}\n\
         read_aiger {aig}\n\
         abc -script +if,-K,{lut_k};print_stats\n\
         write_blif {blif}\n",
        aig = ys_path(aig),
        blif = ys_path(blif),
    )
}

/// Write `contents` to a temporary `.ys` file.
pub fn write_script(contents: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("synth-bench-")
        .suffix(".ys")
        .tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
