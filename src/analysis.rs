//! Cross-flow comparison: rank strategies per metric, lower is better.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Sub;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{FlowResult, Strategy};

/// Label shown when fewer than two strategies report a metric.
pub const NO_COMPARISON: &str = "Unable to compare";

/// Ranking of the strategies that reported one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRanking<T> {
    /// Best strategy; `None` when fewer than two strategies qualified
    pub winner: Option<Strategy>,
    /// Every qualifying value, keyed in priority order
    pub values: BTreeMap<Strategy, T>,
    /// Qualifying strategies sorted best first
    pub order: Vec<Strategy>,
    /// Second best minus best
    pub margin: Option<T>,
    /// Best and second best are exactly equal
    pub tied: bool,
}

impl<T> Default for MetricRanking<T> {
    fn default() -> Self {
        MetricRanking {
            winner: None,
            values: BTreeMap::new(),
            order: Vec::new(),
            margin: None,
            tied: false,
        }
    }
}

impl<T> MetricRanking<T>
where
    T: Copy + PartialOrd + Sub<Output = T>,
{
    /// Rank `values`. Sorting is stable over priority order, so equal values
    /// resolve to the higher-priority strategy.
    pub fn rank(values: BTreeMap<Strategy, T>) -> Self {
        if values.len() < 2 {
            return MetricRanking { values, ..Default::default() };
        }
        let mut sorted: Vec<(Strategy, T)> = values.iter().map(|(s, v)| (*s, *v)).collect();
        sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let (best_strategy, best) = sorted[0];
        let second = sorted[1].1;
        MetricRanking {
            winner: Some(best_strategy),
            order: sorted.iter().map(|(s, _)| *s).collect(),
            margin: Some(second - best),
            tied: second.partial_cmp(&best) == Some(Ordering::Equal),
            values,
        }
    }
}

impl<T> MetricRanking<T> {
    pub fn winner_label(&self) -> &'static str {
        self.winner.map_or(NO_COMPARISON, |s| s.display_name())
    }

    pub fn is_comparable(&self) -> bool {
        self.winner.is_some()
    }
}

/// Per-metric rankings for one input. Each metric is ranked independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Logic depth
    pub timing: MetricRanking<u64>,
    /// LUT count
    pub area: MetricRanking<u64>,
    /// Wall-clock seconds
    pub runtime: MetricRanking<f64>,
    /// Second-fastest runtime over fastest
    pub speedup: Option<f64>,
}

/// Rank every metric across `results`.
///
/// Only succeeded flows that reported a metric take part in its ranking.
pub fn compare(results: &BTreeMap<Strategy, FlowResult>) -> Analysis {
    let succeeded = || results.iter().filter(|(_, r)| r.succeeded);

    let timing = MetricRanking::rank(
        succeeded()
            .filter_map(|(s, r)| r.logic_depth.map(|v| (*s, v)))
            .collect(),
    );
    let area = MetricRanking::rank(
        succeeded()
            .filter_map(|(s, r)| r.cell_count.map(|v| (*s, v)))
            .collect(),
    );
    let runtime = MetricRanking::rank(
        succeeded()
            .filter_map(|(s, r)| r.runtime_seconds.map(|v| (*s, v)))
            .collect(),
    );

    let speedup = match runtime.order.as_slice() {
        [best, second, ..] => {
            let best = runtime.values[best];
            let second = runtime.values[second];
            (best > 0.0).then(|| second / best)
        }
        _ => None,
    };

    Analysis { timing, area, runtime, speedup }
}

/// All flow results for one input plus their analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub input: PathBuf,
    pub results: BTreeMap<Strategy, FlowResult>,
    pub analysis: Analysis,
}

impl Comparison {
    pub fn new(input: impl Into<PathBuf>, results: BTreeMap<Strategy, FlowResult>) -> Self {
        let analysis = compare(&results);
        Comparison { input: input.into(), results, analysis }
    }

    /// Every strategy that ran succeeded.
    pub fn all_succeeded(&self) -> bool {
        !self.results.is_empty() && self.results.values().all(|r| r.succeeded)
    }

    /// No strategy succeeded.
    pub fn all_failed(&self) -> bool {
        self.results.values().all(|r| !r.succeeded)
    }

    pub fn succeeded_count(&self) -> usize {
        self.results.values().filter(|r| r.succeeded).count()
    }
}
