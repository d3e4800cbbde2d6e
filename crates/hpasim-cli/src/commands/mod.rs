use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use hpasim_core::SimulatorConfig;

pub mod defaults;
pub mod run;
pub mod sweep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunFormat {
    Text,
    Json,
    Csv,
    Prometheus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefaultsFormat {
    Toml,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepFormat {
    Text,
    Prometheus,
}

/// Where the configuration comes from, plus per-field overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override producingRateTotal (jobs/s)
    #[arg(long)]
    pub producing_rate: Option<f64>,
    /// Override maxPods
    #[arg(long)]
    pub max_pods: Option<f64>,
    /// Override simulationSeconds
    #[arg(long)]
    pub seconds: Option<f64>,
    /// Override podStartupDelay (seconds)
    #[arg(long)]
    pub startup_delay: Option<f64>,
}

impl ConfigArgs {
    pub fn load(&self) -> anyhow::Result<SimulatorConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(v) = self.producing_rate {
            config.producing_rate_total = Some(v);
        }
        if let Some(v) = self.max_pods {
            config.max_pods = Some(v);
        }
        if let Some(v) = self.seconds {
            config.simulation_seconds = Some(v);
        }
        if let Some(v) = self.startup_delay {
            config.pod_startup_delay = Some(v);
        }
        Ok(config)
    }
}

/// Read `path`, or fall back to the reference configuration.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SimulatorConfig> {
    match path {
        Some(path) => SimulatorConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SimulatorConfig::default()),
    }
}

/// Write `body` to `output`, or print it.
pub fn emit(body: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = body.len(), "report written");
        }
        None => print!("{body}"),
    }
    Ok(())
}
