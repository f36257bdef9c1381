//! Human-readable summaries printed to stdout.

use std::fmt::Write;

use crate::analysis::{Comparison, MetricRanking};
use crate::batch::{BatchRun, WinTally};
use crate::core::{FlowResult, Strategy};

const TROPHY: &str = "🏆";

fn opt(value: Option<u64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn push_flow(out: &mut String, strategy: Strategy, result: &FlowResult) {
    let _ = writeln!(out, "\n{} Results:", strategy.display_name());
    let _ = writeln!(out, "  Success:        {}", if result.succeeded { "✓" } else { "✗" });
    if result.succeeded {
        let _ = writeln!(out, "  Timing levels:  {}", opt(result.logic_depth));
        let _ = writeln!(out, "  LUT count:      {}", opt(result.cell_count));
        let _ = writeln!(out, "  Runtime:        {:.3}s", result.runtime_seconds.unwrap_or_default());
    } else {
        let _ = writeln!(
            out,
            "  Error:          {}",
            result.failure_reason.as_deref().unwrap_or("unknown error")
        );
        if let Some(secs) = result.runtime_seconds {
            let _ = writeln!(out, "  Runtime:        {secs:.3}s (until failure)");
        }
    }
}

fn push_ranking<T, F>(
    out: &mut String,
    label: &str,
    ranking: &MetricRanking<T>,
    margin_note: Option<String>,
    fmt_value: F,
) where
    F: Fn(&T) -> String,
{
    let Some(winner) = ranking.winner else {
        let _ = writeln!(out, "  {:<16}{}", format!("{label}:"), ranking.winner_label());
        return;
    };
    let tie = if ranking.tied { " (tie)" } else { "" };
    let _ = writeln!(out, "  {:<16}{TROPHY} {winner}{tie}", format!("{label}:"));
    if let Some(note) = margin_note {
        let _ = writeln!(out, "                  ({note})");
    }
    for strategy in &ranking.order {
        let marker = if *strategy == winner { TROPHY } else { "  " };
        let _ = writeln!(
            out,
            "    {marker} {:<14}{}",
            strategy.display_name(),
            fmt_value(&ranking.values[strategy])
        );
    }
}

/// Per-strategy results followed by the per-metric rankings.
pub fn render_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);
    let _ = writeln!(out, "\n{rule}\nSYNTHESIS COMPARISON RESULTS\n{rule}");

    for (strategy, result) in &comparison.results {
        push_flow(&mut out, *strategy, result);
    }

    if comparison.succeeded_count() < 2 {
        let _ = writeln!(out, "\nCOMPARISON ANALYSIS: {}", crate::analysis::NO_COMPARISON);
        return out;
    }

    let a = &comparison.analysis;
    let _ = writeln!(out, "\nCOMPARISON ANALYSIS:");
    let levels = a.timing.margin.filter(|m| *m > 0).map(|m| format!("{m} fewer levels"));
    push_ranking(&mut out, "Timing", &a.timing, levels, |v| format!("{v} levels"));
    let luts = a.area.margin.filter(|m| *m > 0).map(|m| format!("{m} fewer LUTs"));
    push_ranking(&mut out, "Area", &a.area, luts, |v| format!("{v} LUTs"));
    let speedup = a
        .speedup
        .filter(|s| *s > 1.0)
        .map(|s| format!("{s:.2}x faster than second best"));
    push_ranking(&mut out, "Runtime", &a.runtime, speedup, |v| format!("{v:.3}s"));
    out
}

fn push_tally(out: &mut String, title: &str, tally: &WinTally) {
    let _ = writeln!(out, "\n{title}:");
    for strategy in Strategy::ALL {
        let _ = writeln!(
            out,
            "  {:<23}{}",
            format!("{} wins:", strategy.display_name()),
            tally.wins_for(strategy)
        );
    }
    let _ = writeln!(out, "  {:<23}{}", "Ties:", tally.ties);
}

/// Counts, win/tie tallies, runtime totals and the overall speedup.
pub fn render_batch_summary(run: &BatchRun) -> String {
    let summary = &run.summary;
    let mut out = String::new();
    let rule = "=".repeat(80);
    let _ = writeln!(out, "\n{rule}\nBATCH SYNTHESIS COMPARISON SUMMARY\n{rule}");

    let _ = writeln!(out, "\nFiles Processed:");
    let _ = writeln!(out, "  Total files:            {}", run.total_files());
    let _ = writeln!(out, "  Successful comparisons: {}", summary.successful_comparisons);
    let _ = writeln!(out, "  Failed comparisons:     {}", summary.failed_comparisons);

    if summary.successful_comparisons > 0 {
        push_tally(&mut out, "Timing Comparison (Logic Levels)", &summary.timing);
        push_tally(&mut out, "Area Comparison (LUT Count)", &summary.area);
        push_tally(&mut out, "Runtime Comparison", &summary.runtime);

        let _ = writeln!(out, "\nTotal Runtime:");
        for (strategy, total) in &summary.total_runtime {
            let _ = writeln!(
                out,
                "  {:<23}{total:.3}s",
                format!("{} total:", strategy.display_name())
            );
        }
        if let Some(speedup) = summary.overall_speedup() {
            let _ = writeln!(
                out,
                "  Overall speedup:       {TROPHY} {} {:.2}x faster than {}",
                speedup.fastest, speedup.ratio, speedup.slowest
            );
        }
    }

    let failures: Vec<_> = run
        .records
        .iter()
        .filter_map(|r| match &r.outcome {
            crate::batch::FileOutcome::Failed { error } => Some((&r.key, error)),
            crate::batch::FileOutcome::Compared(_) => None,
        })
        .collect();
    if !failures.is_empty() {
        let _ = writeln!(out, "\nErrors:");
        for (key, error) in failures {
            let _ = writeln!(out, "  {key}: {error}");
        }
    }

    let _ = writeln!(out, "\n{rule}");
    out
}
