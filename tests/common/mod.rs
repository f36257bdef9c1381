//! Fake CIRCT and Yosys executables for end-to-end tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use synth_bench::ToolPaths;

/// Writes `-o <file>` outputs; fails when the input mentions `syntax_error`.
const CIRCT_VERILOG: &str = r#"#!/bin/sh
out=""
input=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    --*) shift ;;
    *) input="$1"; shift ;;
  esac
done
if grep -q syntax_error "$input"; then
  echo "$input:1:1: error: expected ';'" >&2
  exit 1
fi
echo "hw.module @top() {}" > "$out"
"#;

/// Writes the mapped IR and, when requested, a longest-path report.
const CIRCT_SYNTH: &str = r#"#!/bin/sh
out=""
report=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    --output-longest-path=*) report="${1#--output-longest-path=}"; shift ;;
    *) shift ;;
  esac
done
if [ -n "$FAKE_CIRCT_SYNTH_FAIL" ]; then
  echo "error: failed to legalize operation 'comb.mul'" >&2
  exit 1
fi
echo "hw.module @top() {}" > "$out"
if [ -n "$report" ]; then
  cat > "$report" <<'JSON'
[{"module_name":"top","timing_levels":[{"level":1,"count":4,"percentage":40},{"level":3,"count":9,"percentage":100}]}]
JSON
fi
"#;

const CIRCT_TRANSLATE: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf 'aag 0 0 0 0 0\n' > "$out"
"#;

/// Reads the `-s` script: AIGER input maps to 3 LUTs at depth 2, RTL input
/// to 5 LUTs at depth 4.
const YOSYS: &str = r#"#!/bin/sh
script="$2"
blif=$(sed -n 's/^write_blif //p' "$script")
if grep -q '^read_aiger' "$script"; then
  luts=3; lev=2
else
  luts=5; lev=4
fi
echo "ABC: netlist : i/o = 4/1 lat = 0 nd = 12 lev = 7"
echo "ABC: netlist : i/o = 4/1 lat = 0 nd = $luts lev = $lev"
{
  echo ".model top"
  i=0
  while [ $i -lt $luts ]; do
    echo ".names a b n$i"
    echo "11 1"
    i=$((i + 1))
  done
  echo ".end"
} > "$blif"
"#;

fn write_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Install the fake tools into `dir` and return their paths.
pub fn install_fake_tools(dir: &Path) -> ToolPaths {
    fs::create_dir_all(dir).unwrap();
    ToolPaths {
        circt_verilog: write_tool(dir, "circt-verilog", CIRCT_VERILOG),
        circt_synth: write_tool(dir, "circt-synth", CIRCT_SYNTH),
        circt_translate: write_tool(dir, "circt-translate", CIRCT_TRANSLATE),
        yosys: write_tool(dir, "yosys", YOSYS),
    }
}

/// A failing `circt-synth` for the CIRCT-based flows.
pub fn install_failing_circt_synth(dir: &Path, tools: &mut ToolPaths) {
    let body = CIRCT_SYNTH.replacen(
        "if [ -n \"$FAKE_CIRCT_SYNTH_FAIL\" ]; then",
        "if true; then",
        1,
    );
    tools.circt_synth = write_tool(dir, "circt-synth-broken", &body);
}

pub fn write_design(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

pub const ADDER: &str = "module top(input [3:0] a, b, output [4:0] y);\n  assign y = a + b;\nendmodule\n";
