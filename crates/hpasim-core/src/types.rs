//! Domain types for the HPA simulator.
//!
//! The configuration types mirror the document an operator edits: every
//! numeric field is optional and unvalidated. The output types are
//! immutable snapshots produced once per run.

use serde::{Deserialize, Serialize};

use crate::config::lenient_number;
use crate::normalize::Parameters;

// ── Configuration ─────────────────────────────────────────────────

/// Which observed value drives the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricType {
    /// Seconds a newly arrived job waits given current ready capacity.
    #[default]
    QueueLatency,
    /// Outstanding job count.
    QueueLength,
}

/// How a scale policy expresses its rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalePolicyType {
    /// Absolute number of pods per period.
    Pods,
    /// Percentage of the replica count observed one period ago.
    Percent,
}

/// How candidate bounds from several policies are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectPolicy {
    /// Most permissive bound wins.
    #[default]
    Max,
    /// Most restrictive bound wins.
    Min,
    /// Scaling in this direction is vetoed.
    Disabled,
}

/// Whether the stabilization window scan includes the recommendation
/// computed on the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StabilizationLookback {
    /// Scan offsets `0..=window`, seeded with the current recommendation.
    #[default]
    Inclusive,
    /// Scan offsets `1..=window` only.
    Exclusive,
}

/// A rate limit on scaling in one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePolicy {
    /// Opaque identifier kept for editors that list policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ScalePolicyType,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub period_seconds: Option<f64>,
}

/// Scaling behavior for one direction (up or down).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBehavior {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub stabilization_window_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_policy: Option<SelectPolicy>,
    #[serde(default)]
    pub policies: Vec<ScalePolicy>,
}

/// Requested simulator configuration, as supplied by the caller.
///
/// Nothing here is trusted. Pass it through [`crate::normalize`] (the
/// engine does this itself) to get a safe [`Parameters`] set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<MetricType>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub min_pods: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_pods: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub starting_pods: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub initial_queue_jobs: Option<f64>,
    /// Used to derive the starting queue depth when `initial_queue_jobs` is 0.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub initial_metric_value: Option<f64>,
    /// Jobs per second per ready pod.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub processing_rate_per_pod: Option<f64>,
    /// Jobs per second arriving across the whole workload.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub producing_rate_total: Option<f64>,
    /// Seconds between a pod being requested and it processing work.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub pod_startup_delay: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub simulation_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub target_metric_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub tolerance_fraction: Option<f64>,

    #[serde(default)]
    pub stabilization_lookback: StabilizationLookback,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_up: Option<ScaleBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_down: Option<ScaleBehavior>,
}

impl SimulatorConfig {
    /// A configuration with every field absent. Normalizes to the
    /// documented fallback defaults, not to [`SimulatorConfig::default`].
    pub fn empty() -> Self {
        Self {
            metric_type: None,
            min_pods: None,
            max_pods: None,
            starting_pods: None,
            initial_queue_jobs: None,
            initial_metric_value: None,
            processing_rate_per_pod: None,
            producing_rate_total: None,
            pod_startup_delay: None,
            simulation_seconds: None,
            target_metric_value: None,
            tolerance_fraction: None,
            stabilization_lookback: StabilizationLookback::default(),
            scale_up: None,
            scale_down: None,
        }
    }
}

// ── Output ────────────────────────────────────────────────────────

/// Latency reported when jobs are queued but no pod is ready to process
/// them. A finite sentinel keeps results serializable as JSON.
pub const UNBOUNDED_LATENCY: f64 = 9999.0;

/// Direction of the control decision taken on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleDirection {
    Up,
    Down,
    None,
}

impl ScaleDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleDirection::Up => "up",
            ScaleDirection::Down => "down",
            ScaleDirection::None => "none",
        }
    }
}

/// State of the simulated workload during one second.
///
/// `pods`, `ready_pods`, `queue_jobs`, `latency` and `metric_value` are the
/// values observed at the start of the tick; `processed_jobs` is the work
/// done during it; the desired replica fields are the most recent control
/// decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPoint {
    pub t: u64,
    pub pods: u32,
    pub ready_pods: u32,
    pub queue_jobs: f64,
    /// Seconds; [`UNBOUNDED_LATENCY`] when there is a backlog and no
    /// ready capacity.
    pub latency: f64,
    pub metric_value: f64,
    pub processed_jobs: f64,
    pub desired_replicas_raw: u32,
    pub desired_replicas_effective: u32,
    pub scale_direction: ScaleDirection,
}

/// Headline statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub max_metric_value: f64,
    pub max_queue_jobs: f64,
    pub final_pods: u32,
    pub final_queue_jobs: f64,
    pub total_scale_ups: u32,
    pub total_scale_downs: u32,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub points: Vec<SimulationPoint>,
    pub summary: Summary,
    /// The normalized parameters the run used, including any substitutions.
    pub parameters: Parameters,
}
