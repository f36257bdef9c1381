//! Environment detection utilities for comparison reports.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::config::ToolPaths;

/// Environment information for result reproducibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ram_bytes: Option<u64>,

    pub os: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circt_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub yosys_version: Option<String>,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        EnvironmentInfo {
            cpu_model: None,
            cpu_cores: None,
            total_ram_bytes: None,
            os: std::env::consts::OS.to_string(),
            hostname: None,
            circt_version: None,
            yosys_version: None,
        }
    }
}

impl EnvironmentInfo {
    /// Detect host information and the versions of the configured tools
    pub fn detect(tools: &ToolPaths) -> Self {
        use sysinfo::System;

        let mut sys = System::new_all();
        sys.refresh_all();

        let cpu_model = sys.cpus().first().map(|c| c.brand().to_string());
        let cpu_cores = sys.physical_core_count().map(|c| c as u32);
        let total_ram_bytes = Some(sys.total_memory());
        let os = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
        let hostname = System::host_name();

        EnvironmentInfo {
            cpu_model,
            cpu_cores,
            total_ram_bytes,
            os,
            hostname,
            circt_version: detect_version(&tools.circt_verilog, "--version")
                .and_then(|s| parse_circt_version(&s)),
            yosys_version: detect_version(&tools.yosys, "-V").and_then(|s| parse_yosys_version(&s)),
        }
    }
}

/// Run `<tool> <flag>` and return its trimmed stdout on success
fn detect_version(tool: &Path, flag: &str) -> Option<String> {
    Command::new(tool)
        .arg(flag)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse CIRCT version from `--version` output.
///
/// The LLVM banner is multi-line; the CIRCT line looks like
/// `CIRCT firtool-1.75.0`. Falls back to the first non-empty line.
pub fn parse_circt_version(output: &str) -> Option<String> {
    let circt_line = output
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("CIRCT"));
    if let Some(line) = circt_line {
        return line.split_whitespace().last().map(|s| s.to_string());
    }
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|s| s.to_string())
}

/// Parse Yosys version from `yosys -V` output (`Yosys 0.38 (git sha1 ...)`).
pub fn parse_yosys_version(output: &str) -> Option<String> {
    let output = output.trim();
    if output.is_empty() {
        return None;
    }
    if let Some(rest) = output.strip_prefix("Yosys ") {
        let version = rest.split_whitespace().next()?;
        return Some(version.to_string());
    }
    Some(output.to_string())
}
