//! `hpasim run` — simulate one configuration and report it.

use std::path::Path;

use hpasim_core::SimulationResult;
use hpasim_engine::run_simulation;
use hpasim_metrics::{render_csv, render_prometheus, ScenarioSummary};

use super::{emit, ConfigArgs, RunFormat};
use crate::report;

pub fn run(args: &ConfigArgs, format: RunFormat, output: Option<&Path>) -> anyhow::Result<()> {
    let config = args.load()?;
    let result = run_simulation(&config);
    let body = render(&result, format, &scenario_label(args))?;
    emit(&body, output)
}

pub fn render(
    result: &SimulationResult,
    format: RunFormat,
    scenario: &str,
) -> anyhow::Result<String> {
    Ok(match format {
        RunFormat::Text => report::format_run(result),
        RunFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        RunFormat::Csv => render_csv(&result.points),
        RunFormat::Prometheus => {
            render_prometheus(&[ScenarioSummary::new(scenario, &result.summary)])
        }
    })
}

/// The config file stem, or `default` for the reference configuration.
fn scenario_label(args: &ConfigArgs) -> String {
    args.config
        .as_deref()
        .and_then(Path::file_stem)
        .map_or_else(|| "default".to_string(), |s| s.to_string_lossy().into_owned())
}
