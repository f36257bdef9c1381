//! CIRCT longest-path JSON report.
//!
//! `circt-synth --output-longest-path-json` writes an array of per-module
//! entries; the first entry's `timing_levels` is a histogram of path depths:
//!
//! ```json
//! [{"module_name": "top", "timing_levels": [
//!     {"level": 1, "count": 4, "percentage": 40},
//!     {"level": 3, "count": 10, "percentage": 100}
//! ]}]
//! ```
//!
//! The maximum `level` is the logic depth and the `count` of the 100% bucket is
//! the total LUT count.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::FlowMetrics;

#[derive(Debug, Deserialize)]
struct ModuleEntry {
    #[serde(default)]
    timing_levels: Vec<LevelBucket>,
}

#[derive(Debug, Deserialize)]
struct LevelBucket {
    level: u64,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    percentage: Option<f64>,
}

/// Parse the report text. Malformed or empty input gives empty metrics.
pub fn parse_longest_path(text: &str) -> FlowMetrics {
    let entries: Vec<ModuleEntry> = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "unparsable longest-path report");
            return FlowMetrics::default();
        }
    };

    let Some(levels) = entries.first().map(|e| &e.timing_levels) else {
        return FlowMetrics::default();
    };

    let logic_depth = levels.iter().map(|b| b.level).max();
    let cell_count = levels
        .iter()
        .find(|b| b.percentage == Some(100.0))
        .and_then(|b| b.count);

    FlowMetrics { logic_depth, cell_count }
}

/// Read and parse a report file; a missing file gives empty metrics.
pub fn read_longest_path(path: &Path) -> FlowMetrics {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_longest_path(&text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "longest-path report not readable");
            FlowMetrics::default()
        }
    }
}
