//! Human-readable reports: headline tiles and sweep tables.

use hpasim_core::{Parameters, SimulationResult, Summary};
use hpasim_engine::SweepOutcome;

/// Max-metric multiple of the target that flags a run as alarmed.
pub const ALARM_FACTOR: f64 = 1.5;

pub fn is_alarmed(summary: &Summary, params: &Parameters) -> bool {
    summary.max_metric_value > ALARM_FACTOR * params.target_metric_value
}

/// The four headline tiles plus any substituted config fields.
pub fn format_run(result: &SimulationResult) -> String {
    let params = &result.parameters;
    let summary = &result.summary;
    let mut out = String::new();

    out.push_str(&format!(
        "HPA simulation: {} s, metric {:?}, target {}, pods {}..={}\n\n",
        params.simulation_seconds,
        params.metric_type,
        params.target_metric_value,
        params.min_pods,
        params.max_pods,
    ));

    let alarm = if is_alarmed(summary, params) {
        format!(
            "  ALARM (> {:.2})",
            ALARM_FACTOR * params.target_metric_value
        )
    } else {
        String::new()
    };
    out.push_str(&format!(
        "  max metric    {:>12.2}{alarm}\n",
        summary.max_metric_value
    ));
    out.push_str(&format!("  max queue     {:>12.2}\n", summary.max_queue_jobs));
    out.push_str(&format!("  final pods    {:>12}\n", summary.final_pods));
    out.push_str(&format!(
        "  scale events  {:>12}\n",
        format!("{} up / {} down", summary.total_scale_ups, summary.total_scale_downs)
    ));

    if !params.substitutions.is_empty() {
        out.push_str("\nSubstituted config values:\n");
        for s in &params.substitutions {
            out.push_str(&format!(
                "  {:<40} {} → {}\n",
                s.field,
                display_value(s.requested),
                display_value(s.applied),
            ));
        }
    }

    out
}

/// One row per sweep variant.
pub fn format_sweep(outcomes: &[SweepOutcome]) -> String {
    let mut out = format!(
        "{:<28} {:>10} {:>12} {:>14} {:>6} {:>6}\n",
        "scenario", "final pods", "max metric", "max queue", "ups", "downs"
    );
    for outcome in outcomes {
        let summary = &outcome.result.summary;
        let flag = if is_alarmed(summary, &outcome.result.parameters) {
            "  ALARM"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<28} {:>10} {:>12.2} {:>14.2} {:>6} {:>6}{flag}\n",
            outcome.label,
            summary.final_pods,
            summary.max_metric_value,
            summary.max_queue_jobs,
            summary.total_scale_ups,
            summary.total_scale_downs,
        ));
    }
    out
}

fn display_value(value: Option<f64>) -> String {
    value.map_or_else(|| "(none)".to_string(), |v| v.to_string())
}
