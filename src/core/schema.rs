//! Flow result schema shared by every synthesis strategy.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A synthesis strategy.
///
/// Declaration order is the priority order used to break exact ties when
/// ranking: native CIRCT first, then Yosys+ABC, then the hybrid flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Native flow: circt-verilog -> circt-synth (LUT mapping in CIRCT)
    Circt,
    /// External flow: Yosys front end with ABC LUT mapping
    Yosys,
    /// CIRCT front end, AIGER export, Yosys/ABC LUT mapping
    Hybrid,
}

impl Strategy {
    /// All strategies in priority order.
    pub const ALL: [Strategy; 3] = [Strategy::Circt, Strategy::Yosys, Strategy::Hybrid];

    /// Key used in JSON reports and file names.
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Circt => "circt",
            Strategy::Yosys => "yosys",
            Strategy::Hybrid => "hybrid",
        }
    }

    /// Human-readable flow name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Circt => "CIRCT",
            Strategy::Yosys => "Yosys+ABC",
            Strategy::Hybrid => "CIRCT+Yosys",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Quality-of-result metrics extracted from a successful flow.
///
/// Either value may be absent when the tool produced nothing parseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub logic_depth: Option<u64>,
    pub cell_count: Option<u64>,
}

/// Outcome of running one strategy against one input.
///
/// Built only through [`FlowResult::success`] and [`FlowResult::failure`] so a
/// failed flow never carries metrics. Serialized field names match the
/// persisted report schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    /// Longest combinational path in mapped primitives
    #[serde(rename = "timing_levels")]
    pub logic_depth: Option<u64>,
    /// Number of mapped lookup tables
    #[serde(rename = "lut_count")]
    pub cell_count: Option<u64>,
    /// Wall-clock duration of the whole flow in seconds
    #[serde(rename = "runtime")]
    pub runtime_seconds: Option<f64>,
    /// True only if every stage exited with status zero
    #[serde(rename = "success")]
    pub succeeded: bool,
    /// Diagnostic of the first failing stage
    #[serde(rename = "error_message")]
    pub failure_reason: Option<String>,
}

impl FlowResult {
    /// A flow whose every stage completed.
    pub fn success(metrics: FlowMetrics, runtime: Duration) -> Self {
        FlowResult {
            logic_depth: metrics.logic_depth,
            cell_count: metrics.cell_count,
            runtime_seconds: Some(runtime.as_secs_f64()),
            succeeded: true,
            failure_reason: None,
        }
    }

    /// A flow aborted by `reason`, with the time spent before the abort.
    pub fn failure(reason: impl Into<String>, runtime: Option<Duration>) -> Self {
        FlowResult {
            logic_depth: None,
            cell_count: None,
            runtime_seconds: runtime.map(|d| d.as_secs_f64()),
            succeeded: false,
            failure_reason: Some(reason.into()),
        }
    }

    /// Metrics of a successful flow; `None` for failures.
    pub fn metrics(&self) -> Option<FlowMetrics> {
        self.succeeded.then_some(FlowMetrics {
            logic_depth: self.logic_depth,
            cell_count: self.cell_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut shuffled = vec![Strategy::Hybrid, Strategy::Circt, Strategy::Yosys];
        shuffled.sort();
        assert_eq!(shuffled, Strategy::ALL.to_vec());
    }

    #[test]
    fn test_failure_has_no_metrics() {
        let r = FlowResult::failure("circt-synth failed: boom", Some(Duration::from_millis(250)));
        assert!(!r.succeeded);
        assert!(r.logic_depth.is_none());
        assert!(r.cell_count.is_none());
        assert_eq!(r.runtime_seconds, Some(0.25));
        assert!(r.metrics().is_none());
    }

    #[test]
    fn test_success_keeps_partial_metrics() {
        let r = FlowResult::success(
            FlowMetrics { logic_depth: Some(4), cell_count: None },
            Duration::from_secs(2),
        );
        assert!(r.succeeded);
        assert!(r.failure_reason.is_none());
        assert_eq!(r.runtime_seconds, Some(2.0));
        assert_eq!(r.metrics().unwrap().logic_depth, Some(4));
    }

    #[test]
    fn test_serialized_field_names() {
        let r = FlowResult::success(
            FlowMetrics { logic_depth: Some(3), cell_count: Some(12) },
            Duration::from_secs(1),
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["timing_levels"], 3);
        assert_eq!(v["lut_count"], 12);
        assert_eq!(v["runtime"], 1.0);
        assert_eq!(v["success"], true);
        assert!(v["error_message"].is_null());
    }

    #[test]
    fn test_strategy_keys() {
        assert_eq!(serde_json::to_value(Strategy::Yosys).unwrap(), "yosys");
        assert_eq!(Strategy::Hybrid.key(), "hybrid");
        assert_eq!(Strategy::Circt.to_string(), "CIRCT");
    }
}
