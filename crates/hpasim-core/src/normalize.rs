//! Input normalization — turns a requested [`SimulatorConfig`] into a
//! fully-defined [`Parameters`] set.
//!
//! Every numeric field that is absent, non-finite, or outside its domain
//! is replaced by a fixed default. Each replacement is recorded as a
//! [`Substitution`] so callers can compare what they asked for against
//! what was simulated. Normalization never fails.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::*;

pub const DEFAULT_MIN_PODS: u32 = 1;
pub const DEFAULT_MAX_PODS: u32 = 20;
pub const DEFAULT_STARTING_PODS: u32 = 1;
pub const DEFAULT_PROCESSING_RATE_PER_POD: f64 = 1.0;
pub const DEFAULT_PRODUCING_RATE_TOTAL: f64 = 0.0;
pub const DEFAULT_SIMULATION_SECONDS: u64 = 600;
pub const DEFAULT_TARGET_METRIC_VALUE: f64 = 1.0;
pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.1;

/// A field whose requested value was not used as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    /// Dotted field path, e.g. `scaleUp.policies[1].value`.
    pub field: String,
    /// The value supplied, `None` when absent or non-numeric.
    pub requested: Option<f64>,
    /// The value used instead, `None` when the entry was dropped.
    pub applied: Option<f64>,
}

/// A sanitized scale policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyParams {
    #[serde(rename = "type")]
    pub kind: ScalePolicyType,
    /// Whole pods for [`ScalePolicyType::Pods`], a percentage otherwise.
    pub value: f64,
    pub period_seconds: u64,
}

/// A sanitized scale behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorParams {
    pub stabilization_window_seconds: u64,
    pub select_policy: SelectPolicy,
    pub policies: Vec<PolicyParams>,
}

impl BehaviorParams {
    /// No stabilization and no rate limit.
    pub fn unbounded() -> Self {
        Self {
            stabilization_window_seconds: 0,
            select_policy: SelectPolicy::Max,
            policies: Vec::new(),
        }
    }

    /// Longest lookback (window or policy period) this behavior needs.
    pub fn max_lookback_seconds(&self) -> u64 {
        self.policies
            .iter()
            .map(|p| p.period_seconds)
            .chain(std::iter::once(self.stabilization_window_seconds))
            .max()
            .unwrap_or(0)
    }
}

/// The safe parameter set a simulation runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub metric_type: MetricType,
    pub min_pods: u32,
    pub max_pods: u32,
    pub starting_pods: u32,
    /// Starting queue depth, derived from the initial metric value when
    /// no explicit job count was given.
    pub initial_queue_jobs: f64,
    pub processing_rate_per_pod: f64,
    pub producing_rate_total: f64,
    pub pod_startup_delay: u64,
    pub simulation_seconds: u64,
    pub target_metric_value: f64,
    pub tolerance_fraction: f64,
    pub stabilization_lookback: StabilizationLookback,
    pub scale_up: BehaviorParams,
    pub scale_down: BehaviorParams,
    pub substitutions: Vec<Substitution>,
}

impl Parameters {
    /// Longest lookback any window or policy can request.
    pub fn max_lookback_seconds(&self) -> u64 {
        self.scale_up
            .max_lookback_seconds()
            .max(self.scale_down.max_lookback_seconds())
    }

    /// Whether any requested value was replaced.
    pub fn was_substituted(&self, field: &str) -> bool {
        self.substitutions.iter().any(|s| s.field == field)
    }
}

/// Collects substitutions while fields are sanitized.
#[derive(Default)]
struct Normalizer {
    substitutions: Vec<Substitution>,
}

impl Normalizer {
    fn record(&mut self, field: &str, requested: Option<f64>, applied: Option<f64>) {
        if requested.is_some() {
            warn!(field, ?requested, ?applied, "config value out of range, substituting");
        } else {
            debug!(field, ?applied, "config value missing, using default");
        }
        self.substitutions.push(Substitution {
            field: field.to_string(),
            requested,
            applied,
        });
    }

    /// Finite and `>= 0`, else `default`.
    fn non_negative(&mut self, field: &str, value: Option<f64>, default: f64) -> f64 {
        match value {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            other => {
                self.record(field, other, Some(default));
                default
            }
        }
    }

    /// Finite and `> 0`, else `default`.
    fn positive(&mut self, field: &str, value: Option<f64>, default: f64) -> f64 {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            other => {
                self.record(field, other, Some(default));
                default
            }
        }
    }

    /// Finite and `>= 0`, floored to a whole number, else `default`.
    fn whole(&mut self, field: &str, value: Option<f64>, default: u64) -> u64 {
        match value {
            Some(v) if v.is_finite() && v >= 0.0 => {
                let floored = v.floor();
                if floored != v {
                    self.record(field, Some(v), Some(floored));
                }
                // Saturating float-to-int cast.
                floored as u64
            }
            other => {
                self.record(field, other, Some(default as f64));
                default
            }
        }
    }

    fn pods(&mut self, field: &str, value: Option<f64>, default: u32) -> u32 {
        let n = self.whole(field, value, default as u64);
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    fn behavior(&mut self, field: &str, behavior: Option<&ScaleBehavior>) -> BehaviorParams {
        let Some(behavior) = behavior else {
            return BehaviorParams::unbounded();
        };

        let stabilization_window_seconds = self.whole(
            &format!("{field}.stabilizationWindowSeconds"),
            behavior.stabilization_window_seconds,
            0,
        );

        let mut policies = Vec::with_capacity(behavior.policies.len());
        for (i, policy) in behavior.policies.iter().enumerate() {
            let prefix = format!("{field}.policies[{i}]");
            let value = match policy.value {
                Some(v) if v.is_finite() && v >= 0.0 => v,
                other => {
                    self.record(&format!("{prefix}.value"), other, None);
                    continue;
                }
            };
            let period_seconds = match policy.period_seconds {
                Some(p) if p.is_finite() && p >= 0.0 => p.floor() as u64,
                other => {
                    self.record(&format!("{prefix}.periodSeconds"), other, None);
                    continue;
                }
            };
            let value = match policy.kind {
                ScalePolicyType::Pods => value.floor(),
                ScalePolicyType::Percent => value,
            };
            policies.push(PolicyParams {
                kind: policy.kind,
                value,
                period_seconds,
            });
        }

        BehaviorParams {
            stabilization_window_seconds,
            select_policy: behavior.select_policy.unwrap_or_default(),
            policies,
        }
    }
}

/// Sanitize a requested configuration. Always succeeds.
pub fn normalize(config: &SimulatorConfig) -> Parameters {
    let mut n = Normalizer::default();

    let metric_type = config.metric_type.unwrap_or_default();

    let min_pods = n.pods("minPods", config.min_pods, DEFAULT_MIN_PODS);
    let requested_max = n.pods("maxPods", config.max_pods, DEFAULT_MAX_PODS);
    let max_pods = requested_max.max(min_pods);
    if max_pods != requested_max {
        n.record("maxPods", Some(requested_max as f64), Some(max_pods as f64));
    }
    let requested_start = n.pods("startingPods", config.starting_pods, DEFAULT_STARTING_PODS);
    let starting_pods = requested_start.clamp(min_pods, max_pods);
    if starting_pods != requested_start {
        n.record(
            "startingPods",
            Some(requested_start as f64),
            Some(starting_pods as f64),
        );
    }

    let processing_rate_per_pod = n.non_negative(
        "processingRatePerPod",
        config.processing_rate_per_pod,
        DEFAULT_PROCESSING_RATE_PER_POD,
    );
    let producing_rate_total = n.non_negative(
        "producingRateTotal",
        config.producing_rate_total,
        DEFAULT_PRODUCING_RATE_TOTAL,
    );
    let pod_startup_delay = n.whole("podStartupDelay", config.pod_startup_delay, 0);
    let simulation_seconds = n.whole(
        "simulationSeconds",
        config.simulation_seconds,
        DEFAULT_SIMULATION_SECONDS,
    );
    let target_metric_value = n.positive(
        "targetMetricValue",
        config.target_metric_value,
        DEFAULT_TARGET_METRIC_VALUE,
    );
    let tolerance_fraction = n.non_negative(
        "toleranceFraction",
        config.tolerance_fraction,
        DEFAULT_TOLERANCE_FRACTION,
    );

    let mut initial_queue_jobs = n.non_negative("initialQueueJobs", config.initial_queue_jobs, 0.0);
    let initial_metric_value =
        n.non_negative("initialMetricValue", config.initial_metric_value, 0.0);
    if initial_queue_jobs == 0.0 && initial_metric_value > 0.0 {
        initial_queue_jobs = match metric_type {
            MetricType::QueueLatency => {
                (initial_metric_value * starting_pods as f64 * processing_rate_per_pod).ceil()
            }
            MetricType::QueueLength => initial_metric_value.ceil(),
        };
    }

    let scale_up = n.behavior("scaleUp", config.scale_up.as_ref());
    let scale_down = n.behavior("scaleDown", config.scale_down.as_ref());

    Parameters {
        metric_type,
        min_pods,
        max_pods,
        starting_pods,
        initial_queue_jobs,
        processing_rate_per_pod,
        producing_rate_total,
        pod_startup_delay,
        simulation_seconds,
        target_metric_value,
        tolerance_fraction,
        stabilization_lookback: config.stabilization_lookback,
        scale_up,
        scale_down,
        substitutions: n.substitutions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_defaults_pass_through_unchanged() {
        let params = normalize(&SimulatorConfig::default());
        assert!(params.substitutions.is_empty(), "{:?}", params.substitutions);
        assert_eq!(params.min_pods, 2);
        assert_eq!(params.max_pods, 25);
        assert_eq!(params.starting_pods, 10);
        assert_eq!(params.target_metric_value, 60.0);
        assert_eq!(params.scale_up.policies.len(), 2);
        assert_eq!(params.scale_down.stabilization_window_seconds, 300);
        assert_eq!(params.max_lookback_seconds(), 300);
    }

    #[test]
    fn empty_config_uses_fallback_defaults() {
        let params = normalize(&SimulatorConfig::empty());
        assert_eq!(params.metric_type, MetricType::QueueLatency);
        assert_eq!(params.min_pods, DEFAULT_MIN_PODS);
        assert_eq!(params.max_pods, DEFAULT_MAX_PODS);
        assert_eq!(params.starting_pods, DEFAULT_STARTING_PODS);
        assert_eq!(params.processing_rate_per_pod, 1.0);
        assert_eq!(params.producing_rate_total, 0.0);
        assert_eq!(params.simulation_seconds, 600);
        assert_eq!(params.target_metric_value, 1.0);
        assert_eq!(params.tolerance_fraction, 0.1);
        assert_eq!(params.pod_startup_delay, 0);
        assert_eq!(params.scale_up, BehaviorParams::unbounded());
        assert_eq!(params.scale_down, BehaviorParams::unbounded());
        assert!(params.was_substituted("minPods"));
        assert!(params.was_substituted("simulationSeconds"));
    }

    #[test]
    fn out_of_domain_values_are_substituted() {
        let config = SimulatorConfig {
            min_pods: Some(-3.0),
            target_metric_value: Some(0.0),
            tolerance_fraction: Some(f64::NAN),
            processing_rate_per_pod: Some(-10.0),
            simulation_seconds: Some(f64::INFINITY),
            ..SimulatorConfig::default()
        };
        let params = normalize(&config);

        assert_eq!(params.min_pods, DEFAULT_MIN_PODS);
        assert_eq!(params.target_metric_value, DEFAULT_TARGET_METRIC_VALUE);
        assert_eq!(params.tolerance_fraction, DEFAULT_TOLERANCE_FRACTION);
        assert_eq!(params.processing_rate_per_pod, DEFAULT_PROCESSING_RATE_PER_POD);
        assert_eq!(params.simulation_seconds, DEFAULT_SIMULATION_SECONDS);

        let target = params
            .substitutions
            .iter()
            .find(|s| s.field == "targetMetricValue")
            .unwrap();
        assert_eq!(target.requested, Some(0.0));
        assert_eq!(target.applied, Some(1.0));
    }

    #[test]
    fn max_pods_raised_to_min_pods() {
        let config = SimulatorConfig {
            min_pods: Some(8.0),
            max_pods: Some(3.0),
            ..SimulatorConfig::default()
        };
        let params = normalize(&config);
        assert_eq!(params.min_pods, 8);
        assert_eq!(params.max_pods, 8);
        assert!(params.was_substituted("maxPods"));
    }

    #[test]
    fn starting_pods_clamped_into_bounds() {
        let below = normalize(&SimulatorConfig {
            starting_pods: Some(0.0),
            ..SimulatorConfig::default()
        });
        assert_eq!(below.starting_pods, 2);

        let above = normalize(&SimulatorConfig {
            starting_pods: Some(40.0),
            ..SimulatorConfig::default()
        });
        assert_eq!(above.starting_pods, 25);
        assert!(above.was_substituted("startingPods"));
    }

    #[test]
    fn fractional_pod_counts_are_floored() {
        let params = normalize(&SimulatorConfig {
            starting_pods: Some(4.7),
            ..SimulatorConfig::default()
        });
        assert_eq!(params.starting_pods, 4);
    }

    #[test]
    fn initial_queue_derived_from_latency() {
        let params = normalize(&SimulatorConfig {
            initial_queue_jobs: Some(0.0),
            initial_metric_value: Some(1.5),
            ..SimulatorConfig::default()
        });
        // ceil(1.5 s × 10 pods × 100 jobs/s)
        assert_eq!(params.initial_queue_jobs, 1500.0);
    }

    #[test]
    fn initial_queue_derived_from_length() {
        let params = normalize(&SimulatorConfig {
            metric_type: Some(MetricType::QueueLength),
            initial_metric_value: Some(42.2),
            ..SimulatorConfig::default()
        });
        assert_eq!(params.initial_queue_jobs, 43.0);
    }

    #[test]
    fn explicit_queue_wins_over_metric_value() {
        let params = normalize(&SimulatorConfig {
            initial_queue_jobs: Some(7.0),
            initial_metric_value: Some(100.0),
            ..SimulatorConfig::default()
        });
        assert_eq!(params.initial_queue_jobs, 7.0);
    }

    #[test]
    fn invalid_policies_are_dropped() {
        let mut config = SimulatorConfig::default();
        let up = config.scale_up.as_mut().unwrap();
        up.policies[0].value = Some(-1.0);
        up.policies.push(ScalePolicy {
            id: None,
            kind: ScalePolicyType::Pods,
            value: Some(3.9),
            period_seconds: None,
        });
        up.policies.push(ScalePolicy {
            id: None,
            kind: ScalePolicyType::Pods,
            value: Some(3.9),
            period_seconds: Some(60.0),
        });

        let params = normalize(&config);
        assert_eq!(params.scale_up.policies.len(), 2);
        assert_eq!(params.scale_up.policies[0].kind, ScalePolicyType::Percent);
        assert_eq!(params.scale_up.policies[1].value, 3.0);
        assert!(params.was_substituted("scaleUp.policies[0].value"));
        assert!(params.was_substituted("scaleUp.policies[2].periodSeconds"));
    }

    #[test]
    fn missing_select_policy_defaults_to_max() {
        let config = SimulatorConfig {
            scale_up: Some(ScaleBehavior {
                stabilization_window_seconds: Some(-5.0),
                select_policy: None,
                policies: Vec::new(),
            }),
            ..SimulatorConfig::default()
        };
        let params = normalize(&config);
        assert_eq!(params.scale_up.select_policy, SelectPolicy::Max);
        assert_eq!(params.scale_up.stabilization_window_seconds, 0);
        assert!(params.was_substituted("scaleUp.stabilizationWindowSeconds"));
    }
}
