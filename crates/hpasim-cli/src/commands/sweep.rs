//! `hpasim sweep` — simulate variants of one configuration concurrently.

use std::path::Path;

use anyhow::bail;
use hpasim_engine::{run_sweep, SweepOutcome, Variant};
use hpasim_metrics::{render_prometheus, ScenarioSummary};

use super::{load_config, SweepFormat};
use crate::report;

pub fn sweep(
    config: Option<&Path>,
    max_pods: &[u32],
    producing_rates: &[f64],
    format: SweepFormat,
) -> anyhow::Result<()> {
    let base = load_config(config)?;
    let variants = if !max_pods.is_empty() {
        Variant::max_pods(&base, max_pods)
    } else if !producing_rates.is_empty() {
        Variant::producing_rates(&base, producing_rates)
    } else {
        bail!("sweep needs --max-pods or --producing-rate values");
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let outcomes = runtime.block_on(run_sweep(variants))?;
    print!("{}", render(&outcomes, format));
    Ok(())
}

pub fn render(outcomes: &[SweepOutcome], format: SweepFormat) -> String {
    match format {
        SweepFormat::Text => report::format_sweep(outcomes),
        SweepFormat::Prometheus => {
            let runs: Vec<_> = outcomes
                .iter()
                .map(|o| ScenarioSummary::new(&o.label, &o.result.summary))
                .collect();
            render_prometheus(&runs)
        }
    }
}
