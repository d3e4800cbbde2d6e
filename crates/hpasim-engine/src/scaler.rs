//! Autoscaler — the HPA control step.
//!
//! On each sync tick the autoscaler turns the observed metric into a raw
//! replica recommendation, damps it with the stabilization windows, rate
//! limits it with the scale policies, and clamps it to the pod bounds.
//! Between sync ticks it repeats its last decision.

use tracing::trace;

use hpasim_core::{BehaviorParams, Parameters, ScaleDirection, StabilizationLookback};

use crate::history::History;
use crate::policy;

/// Seconds between control loop evaluations.
pub const HPA_SYNC_PERIOD_SECS: u64 = 15;

/// Whether the control loop runs on second `t`.
pub fn is_sync_tick(t: u64) -> bool {
    t % HPA_SYNC_PERIOD_SECS == 0
}

/// The outcome of one control step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Ratio-formula recommendation, clamped to the pod bounds.
    pub raw: u32,
    /// Recommendation after the stabilization windows.
    pub stabilized: u32,
    /// Replica count to apply.
    pub effective: u32,
    pub direction: ScaleDirection,
}

/// HPA control state for one run.
#[derive(Debug, Clone)]
pub struct Autoscaler {
    min_pods: u32,
    max_pods: u32,
    target_metric_value: f64,
    tolerance_fraction: f64,
    lookback: StabilizationLookback,
    scale_up: BehaviorParams,
    scale_down: BehaviorParams,
    /// Raw recommendation per simulated second.
    raw_history: History,
    last_raw: u32,
    last_effective: u32,
}

impl Autoscaler {
    pub fn new(params: &Parameters) -> Self {
        Self {
            min_pods: params.min_pods,
            max_pods: params.max_pods,
            target_metric_value: params.target_metric_value,
            tolerance_fraction: params.tolerance_fraction,
            lookback: params.stabilization_lookback,
            scale_up: params.scale_up.clone(),
            scale_down: params.scale_down.clone(),
            raw_history: History::new(
                params.starting_pods,
                params.max_lookback_seconds(),
                params.simulation_seconds,
            ),
            last_raw: params.starting_pods,
            last_effective: params.starting_pods,
        }
    }

    pub fn raw_history(&self) -> &History {
        &self.raw_history
    }

    /// `ceil(current × metric / target)` outside the tolerance band,
    /// `current` inside it, clamped to the pod bounds.
    pub fn desired_raw(&self, metric_value: f64, current_pods: u32) -> u32 {
        let ratio = metric_value / self.target_metric_value;
        let raw = if (ratio - 1.0).abs() > self.tolerance_fraction {
            // Saturating float-to-int cast.
            (current_pods as f64 * ratio).ceil() as u32
        } else {
            current_pods
        };
        raw.clamp(self.min_pods, self.max_pods)
    }

    /// Damp `raw` with the stabilization window of the direction it points.
    ///
    /// Scale-up takes the lowest recommendation in the window, scale-down
    /// the highest. The window extreme is used as is, so it may land on the
    /// other side of `current_pods`.
    pub fn stabilize(&self, raw: u32, current_pods: u32, t: u64) -> u32 {
        let t = t as i64;
        if raw > current_pods && self.scale_up.stabilization_window_seconds > 0 {
            self.window(t, self.scale_up.stabilization_window_seconds)
                .min()
                .unwrap_or(raw)
        } else if raw < current_pods && self.scale_down.stabilization_window_seconds > 0 {
            self.window(t, self.scale_down.stabilization_window_seconds)
                .max()
                .unwrap_or(raw)
        } else {
            raw
        }
    }

    fn window(&self, t: i64, seconds: u64) -> impl Iterator<Item = u32> + '_ {
        let from = match self.lookback {
            StabilizationLookback::Inclusive => 0,
            StabilizationLookback::Exclusive => 1,
        };
        self.raw_history.trailing(t, from, seconds)
    }

    /// Run the control step for sync tick `t`.
    pub fn evaluate(
        &mut self,
        t: u64,
        metric_value: f64,
        current_pods: u32,
        pod_history: &History,
    ) -> Decision {
        let raw = self.desired_raw(metric_value, current_pods);
        self.raw_history.push(raw);
        self.last_raw = raw;

        let stabilized = self.stabilize(raw, current_pods, t);
        let direction = match stabilized.cmp(&current_pods) {
            std::cmp::Ordering::Greater => ScaleDirection::Up,
            std::cmp::Ordering::Less => ScaleDirection::Down,
            std::cmp::Ordering::Equal => ScaleDirection::None,
        };

        let t_signed = t as i64;
        let limited = match direction {
            ScaleDirection::Up => policy::limit(
                &self.scale_up,
                direction,
                stabilized,
                current_pods,
                t_signed,
                pod_history,
            ),
            ScaleDirection::Down => policy::limit(
                &self.scale_down,
                direction,
                stabilized,
                current_pods,
                t_signed,
                pod_history,
            ),
            ScaleDirection::None => stabilized,
        };
        let effective = limited.clamp(self.min_pods, self.max_pods);

        if raw != stabilized || stabilized != effective {
            trace!(
                t,
                raw,
                stabilized,
                effective,
                direction = direction.as_str(),
                "recommendation held back"
            );
        }

        self.last_effective = effective;
        Decision {
            raw,
            stabilized,
            effective,
            direction,
        }
    }

    /// Carry the last decision through a non-sync tick.
    pub fn hold(&mut self) -> Decision {
        self.raw_history.push(self.last_raw);
        Decision {
            raw: self.last_raw,
            stabilized: self.last_effective,
            effective: self.last_effective,
            direction: ScaleDirection::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpasim_core::{normalize, SelectPolicy, SimulatorConfig};

    fn test_params() -> Parameters {
        normalize(&SimulatorConfig::default())
    }

    fn flat_pods(params: &Parameters) -> History {
        History::new(params.starting_pods, params.max_lookback_seconds(), 0)
    }

    #[test]
    fn sync_ticks_every_period() {
        assert!(is_sync_tick(0));
        assert!(!is_sync_tick(1));
        assert!(!is_sync_tick(14));
        assert!(is_sync_tick(15));
        assert!(is_sync_tick(1800));
    }

    #[test]
    fn within_tolerance_proposes_no_change() {
        let scaler = Autoscaler::new(&test_params());
        // Target 60, tolerance 0.1 → [54, 66] is the dead band.
        assert_eq!(scaler.desired_raw(60.0, 10), 10);
        assert_eq!(scaler.desired_raw(65.0, 10), 10);
        assert_eq!(scaler.desired_raw(55.0, 10), 10);
    }

    #[test]
    fn outside_tolerance_scales_by_ratio() {
        let scaler = Autoscaler::new(&test_params());
        // 90 / 60 = 1.5 → ceil(10 × 1.5)
        assert_eq!(scaler.desired_raw(90.0, 10), 15);
        // 30 / 60 = 0.5 → ceil(10 × 0.5)
        assert_eq!(scaler.desired_raw(30.0, 10), 5);
    }

    #[test]
    fn raw_clamped_to_bounds() {
        let scaler = Autoscaler::new(&test_params());
        assert_eq!(scaler.desired_raw(6000.0, 10), 25);
        assert_eq!(scaler.desired_raw(0.0, 10), 2);
    }

    #[test]
    fn unbounded_latency_saturates_to_max() {
        let scaler = Autoscaler::new(&test_params());
        assert_eq!(scaler.desired_raw(hpasim_core::UNBOUNDED_LATENCY, 10), 25);
    }

    #[test]
    fn scale_down_window_holds_highest_recent() {
        let params = test_params();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        // Queue empty at t = 0: raw wants the minimum, but the pre-fill
        // (10 pods) is still inside the 300 s window.
        let decision = scaler.evaluate(0, 0.0, 10, &pods);
        assert_eq!(decision.raw, 2);
        assert_eq!(decision.stabilized, 10);
        assert_eq!(decision.effective, 10);
        assert_eq!(decision.direction, ScaleDirection::None);
    }

    #[test]
    fn scale_up_window_holds_lowest_recent() {
        let mut params = test_params();
        params.scale_up.stabilization_window_seconds = 60;
        params.scale_up.policies.clear();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        // Pre-fill of 10 is inside the window: no scale-up yet.
        let decision = scaler.evaluate(0, 120.0, 10, &pods);
        assert_eq!(decision.raw, 20);
        assert_eq!(decision.stabilized, 10);
        assert_eq!(decision.direction, ScaleDirection::None);

        for _ in 1..=60 {
            scaler.hold();
        }
        // Window now covers only t = 1..=61, all holding raw 20.
        let decision = scaler.evaluate(61, 120.0, 10, &pods);
        assert_eq!(decision.stabilized, 20);
        assert_eq!(decision.direction, ScaleDirection::Up);
        assert_eq!(decision.effective, 20);
    }

    #[test]
    fn exclusive_lookback_ignores_current_recommendation() {
        let mut params = test_params();
        params.stabilization_lookback = StabilizationLookback::Exclusive;
        params.scale_up.stabilization_window_seconds = 15;
        params.scale_up.policies.clear();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        // Seconds 0..=14 record raw 20.
        scaler.evaluate(0, 120.0, 10, &pods);
        for _ in 1..15 {
            scaler.hold();
        }
        // At t = 15 raw is 15, but the window (t = 0..=14) only saw 20.
        let decision = scaler.evaluate(15, 90.0, 10, &pods);
        assert_eq!(decision.raw, 15);
        assert_eq!(decision.stabilized, 20);
    }

    #[test]
    fn inclusive_lookback_counts_current_recommendation() {
        let mut params = test_params();
        params.scale_up.stabilization_window_seconds = 15;
        params.scale_up.policies.clear();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        scaler.evaluate(0, 120.0, 10, &pods);
        for _ in 1..15 {
            scaler.hold();
        }
        let decision = scaler.evaluate(15, 90.0, 10, &pods);
        assert_eq!(decision.stabilized, 15);
    }

    #[test]
    fn scale_down_window_can_point_up() {
        let params = test_params();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        // 150 / 60 = 2.5 → raw 25 at t = 0.
        assert_eq!(scaler.evaluate(0, 150.0, 10, &pods).raw, 25);
        for _ in 1..15 {
            scaler.hold();
        }

        // Raw falls below the current 12, but the 300 s window still holds
        // 25, which is above the current count.
        let decision = scaler.evaluate(15, 30.0, 12, &pods);
        assert_eq!(decision.raw, 6);
        assert_eq!(decision.stabilized, 25);
        assert_eq!(decision.direction, ScaleDirection::Up);
        // Up policies against the 10-pod reference allow 20.
        assert_eq!(decision.effective, 20);
    }

    #[test]
    fn policies_limit_scale_up() {
        let params = test_params();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        // Raw 25; policies allow max(10 + 2, 10 + 100%) = 20.
        let decision = scaler.evaluate(0, 600.0, 10, &pods);
        assert_eq!(decision.raw, 25);
        assert_eq!(decision.stabilized, 25);
        assert_eq!(decision.effective, 20);
        assert_eq!(decision.direction, ScaleDirection::Up);
    }

    #[test]
    fn disabled_scale_up_vetoes() {
        let mut params = test_params();
        params.scale_up.select_policy = SelectPolicy::Disabled;
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        let decision = scaler.evaluate(0, 600.0, 10, &pods);
        assert_eq!(decision.direction, ScaleDirection::Up);
        assert_eq!(decision.effective, 10);
    }

    #[test]
    fn hold_repeats_last_decision() {
        let params = test_params();
        let mut scaler = Autoscaler::new(&params);
        let pods = flat_pods(&params);

        let decision = scaler.evaluate(0, 600.0, 10, &pods);
        let held = scaler.hold();
        assert_eq!(held.raw, decision.raw);
        assert_eq!(held.effective, decision.effective);
        assert_eq!(held.direction, ScaleDirection::None);
        assert_eq!(scaler.raw_history().len(), 2);
    }
}
