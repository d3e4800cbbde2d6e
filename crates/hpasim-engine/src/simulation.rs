//! Simulation — drives physics, control, and pod lifecycle one second at
//! a time.
//!
//! All mutable state for a run lives in [`Simulation`]. Nothing is shared
//! between runs, so independent simulations can execute in parallel.

use tracing::{debug, info};

use hpasim_core::{
    normalize, MetricType, Parameters, SimulationPoint, SimulationResult, SimulatorConfig,
};

use crate::history::History;
use crate::lifecycle::PodLifecycle;
use crate::physics;
use crate::scaler::{is_sync_tick, Autoscaler};
use crate::summary::summarize;

/// Upper bound on points reserved up front.
const MAX_PREALLOC_POINTS: u64 = 86_400;

/// A single simulation run in progress.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: Parameters,
    /// Next second to simulate.
    t: u64,
    queue: f64,
    pods: PodLifecycle,
    /// Requested replicas at the end of each second.
    pod_history: History,
    autoscaler: Autoscaler,
    points: Vec<SimulationPoint>,
}

impl Simulation {
    /// Start a run from already-normalized parameters.
    pub fn new(params: Parameters) -> Self {
        let pod_history = History::new(
            params.starting_pods,
            params.max_lookback_seconds(),
            params.simulation_seconds,
        );
        let capacity = (params.simulation_seconds.min(MAX_PREALLOC_POINTS) + 1) as usize;
        Self {
            t: 0,
            queue: params.initial_queue_jobs,
            pods: PodLifecycle::new(params.starting_pods, params.pod_startup_delay),
            pod_history,
            autoscaler: Autoscaler::new(&params),
            points: Vec::with_capacity(capacity),
            params,
        }
    }

    /// Normalize `config` and start a run.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(normalize(config))
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn points(&self) -> &[SimulationPoint] {
        &self.points
    }

    pub fn pod_history(&self) -> &History {
        &self.pod_history
    }

    /// Whether every second up to and including `simulation_seconds` has run.
    pub fn is_finished(&self) -> bool {
        self.points.len() as u64 > self.params.simulation_seconds
    }

    /// Simulate the next second and return its point, or `None` once the
    /// run is finished.
    pub fn step(&mut self) -> Option<&SimulationPoint> {
        if self.is_finished() {
            return None;
        }
        let t = self.t;

        // Pods finishing startup count toward this second's capacity.
        self.pods.tick();
        let current_pods = self.pods.total();
        let ready_pods = self.pods.ready();

        let flow = physics::step(
            self.queue,
            ready_pods,
            self.params.processing_rate_per_pod,
            self.params.producing_rate_total,
        );
        let metric_value = match self.params.metric_type {
            MetricType::QueueLatency => flow.latency,
            MetricType::QueueLength => self.queue,
        };

        let decision = if is_sync_tick(t) {
            self.autoscaler
                .evaluate(t, metric_value, current_pods, &self.pod_history)
        } else {
            self.autoscaler.hold()
        };

        if decision.effective != current_pods {
            debug!(
                t,
                from = current_pods,
                to = decision.effective,
                direction = decision.direction.as_str(),
                metric = metric_value,
                "scaling"
            );
            self.pods.scale_to(decision.effective);
        }
        self.pod_history.push(self.pods.total());

        self.points.push(SimulationPoint {
            t,
            pods: current_pods,
            ready_pods,
            queue_jobs: self.queue,
            latency: flow.latency,
            metric_value,
            processed_jobs: flow.processed,
            desired_replicas_raw: decision.raw,
            desired_replicas_effective: decision.effective,
            scale_direction: decision.direction,
        });

        self.queue = flow.next_queue;
        self.t += 1;
        self.points.last()
    }

    /// Run to completion.
    pub fn run(mut self) -> SimulationResult {
        info!(
            seconds = self.params.simulation_seconds,
            metric = ?self.params.metric_type,
            min_pods = self.params.min_pods,
            max_pods = self.params.max_pods,
            starting_pods = self.params.starting_pods,
            substitutions = self.params.substitutions.len(),
            "simulation started"
        );

        while self.step().is_some() {}

        let summary = summarize(&self.points, self.params.starting_pods);
        info!(
            final_pods = summary.final_pods,
            max_metric = summary.max_metric_value,
            max_queue = summary.max_queue_jobs,
            scale_ups = summary.total_scale_ups,
            scale_downs = summary.total_scale_downs,
            "simulation finished"
        );

        SimulationResult {
            points: self.points,
            summary,
            parameters: self.params,
        }
    }
}

/// Run one simulation. Never fails: invalid numeric input is replaced by
/// defaults (see [`hpasim_core::normalize`]).
pub fn run_simulation(config: &SimulatorConfig) -> SimulationResult {
    Simulation::from_config(config).run()
}
