//! Simulator config loading and rendering (TOML or JSON).

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, ConfigResult};
use crate::types::*;

/// Accepts any value for a numeric field: numbers pass through, anything
/// else (strings, booleans, null) reads as absent.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) => Some(n),
        Lenient::Other(_) => None,
    })
}

impl SimulatorConfig {
    /// Load a config file, choosing the parser from the extension.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SimulatorConfig {
    /// The reference scenario: a latency-targeted queue worker slightly
    /// under-provisioned for its load.
    fn default() -> Self {
        SimulatorConfig {
            metric_type: Some(MetricType::QueueLatency),
            min_pods: Some(2.0),
            max_pods: Some(25.0),
            starting_pods: Some(10.0),
            initial_queue_jobs: Some(0.0),
            initial_metric_value: Some(0.0),
            processing_rate_per_pod: Some(100.0),
            producing_rate_total: Some(1115.0),
            pod_startup_delay: Some(0.0),
            simulation_seconds: Some(1800.0),
            target_metric_value: Some(60.0),
            tolerance_fraction: Some(0.1),
            stabilization_lookback: StabilizationLookback::Inclusive,
            scale_up: Some(ScaleBehavior {
                stabilization_window_seconds: Some(0.0),
                select_policy: Some(SelectPolicy::Max),
                policies: vec![
                    ScalePolicy {
                        id: Some("default-up-pods".to_string()),
                        kind: ScalePolicyType::Pods,
                        value: Some(2.0),
                        period_seconds: Some(180.0),
                    },
                    ScalePolicy {
                        id: Some("default-up-percent".to_string()),
                        kind: ScalePolicyType::Percent,
                        value: Some(100.0),
                        period_seconds: Some(180.0),
                    },
                ],
            }),
            scale_down: Some(ScaleBehavior {
                stabilization_window_seconds: Some(300.0),
                select_policy: Some(SelectPolicy::Max),
                policies: vec![ScalePolicy {
                    id: Some("default-down-percent".to_string()),
                    kind: ScalePolicyType::Percent,
                    value: Some(20.0),
                    period_seconds: Some(180.0),
                }],
            }),
        }
    }
}
