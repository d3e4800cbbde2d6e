//! Sweep — run several variants of one configuration side by side.
//!
//! Each variant gets its own [`crate::Simulation`] on the blocking thread
//! pool. Results come back in input order.

use tracing::{debug, info};

use hpasim_core::{SimulationResult, SimulatorConfig};

use crate::simulation::run_simulation;

/// One labeled configuration in a sweep.
#[derive(Debug, Clone)]
pub struct Variant {
    pub label: String,
    pub config: SimulatorConfig,
}

impl Variant {
    pub fn new(label: impl Into<String>, config: SimulatorConfig) -> Self {
        Self {
            label: label.into(),
            config,
        }
    }

    /// One variant per `maxPods` value.
    pub fn max_pods(base: &SimulatorConfig, values: &[u32]) -> Vec<Self> {
        values
            .iter()
            .map(|&v| {
                let config = SimulatorConfig {
                    max_pods: Some(v as f64),
                    ..base.clone()
                };
                Self::new(format!("maxPods={v}"), config)
            })
            .collect()
    }

    /// One variant per `producingRateTotal` value.
    pub fn producing_rates(base: &SimulatorConfig, values: &[f64]) -> Vec<Self> {
        values
            .iter()
            .map(|&v| {
                let config = SimulatorConfig {
                    producing_rate_total: Some(v),
                    ..base.clone()
                };
                Self::new(format!("producingRateTotal={v}"), config)
            })
            .collect()
    }
}

/// The result of one sweep variant.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub label: String,
    pub result: SimulationResult,
}

/// Run every variant concurrently.
pub async fn run_sweep(variants: Vec<Variant>) -> anyhow::Result<Vec<SweepOutcome>> {
    info!(variants = variants.len(), "sweep started");

    let handles: Vec<_> = variants
        .into_iter()
        .map(|variant| {
            tokio::task::spawn_blocking(move || {
                let result = run_simulation(&variant.config);
                debug!(label = %variant.label, "variant finished");
                SweepOutcome {
                    label: variant.label,
                    result,
                }
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await?);
    }
    Ok(outcomes)
}
