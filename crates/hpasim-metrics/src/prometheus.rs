//! Prometheus text exposition format.
//!
//! Renders run summaries into the Prometheus text exposition format so a
//! sweep can be pushed to a gateway or diffed as plain text.

use hpasim_core::Summary;

/// One labeled run summary.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSummary<'a> {
    pub scenario: &'a str,
    pub summary: &'a Summary,
}

impl<'a> ScenarioSummary<'a> {
    pub fn new(scenario: &'a str, summary: &'a Summary) -> Self {
        Self { scenario, summary }
    }
}

/// Render run summaries into Prometheus text format.
///
/// Produces GAUGE and COUNTER metrics with `scenario` labels.
pub fn render_prometheus(runs: &[ScenarioSummary<'_>]) -> String {
    let mut out = String::new();

    family(
        &mut out,
        "hpasim_max_metric_value",
        "Highest metric value observed during the run.",
        "gauge",
        runs,
        |s| format!("{:.2}", s.max_metric_value),
    );
    family(
        &mut out,
        "hpasim_max_queue_jobs",
        "Deepest queue observed during the run.",
        "gauge",
        runs,
        |s| format!("{:.2}", s.max_queue_jobs),
    );
    family(
        &mut out,
        "hpasim_final_pods",
        "Requested replicas at the last simulated second.",
        "gauge",
        runs,
        |s| s.final_pods.to_string(),
    );
    family(
        &mut out,
        "hpasim_final_queue_jobs",
        "Queue depth at the last simulated second.",
        "gauge",
        runs,
        |s| format!("{:.2}", s.final_queue_jobs),
    );
    family(
        &mut out,
        "hpasim_scale_ups_total",
        "Scale-up events applied during the run.",
        "counter",
        runs,
        |s| s.total_scale_ups.to_string(),
    );
    family(
        &mut out,
        "hpasim_scale_downs_total",
        "Scale-down events applied during the run.",
        "counter",
        runs,
        |s| s.total_scale_downs.to_string(),
    );

    out
}

fn family(
    out: &mut String,
    name: &str,
    help: &str,
    kind: &str,
    runs: &[ScenarioSummary<'_>],
    value: impl Fn(&Summary) -> String,
) {
    out.push_str(&format!("# HELP {name} {help}\n# TYPE {name} {kind}\n"));
    for run in runs {
        out.push_str(&format!(
            "{name}{{scenario=\"{}\"}} {}\n",
            escape_label(run.scenario),
            value(run.summary)
        ));
    }
}

/// Escape a label value: backslash, double quote, and newline.
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
