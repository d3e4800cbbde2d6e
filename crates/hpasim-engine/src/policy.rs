//! Scale policies — rate limits on how far one decision may move.
//!
//! Each policy looks back `periodSeconds` in the replica history and
//! allows a fixed number of pods, or a percentage of the replicas seen
//! then, to be added (scale-up) or removed (scale-down). `selectPolicy`
//! picks which candidate bound wins.

use hpasim_core::{BehaviorParams, PolicyParams, ScaleDirection, ScalePolicyType, SelectPolicy};

use crate::history::History;

/// Pods a policy allows to change relative to `reference_pods`.
pub fn limit_amount(policy: &PolicyParams, reference_pods: u32) -> u32 {
    let amount = match policy.kind {
        ScalePolicyType::Pods => policy.value,
        ScalePolicyType::Percent => (reference_pods as f64 * policy.value / 100.0).ceil(),
    };
    // Saturating float-to-int cast.
    amount as u32
}

/// The replica bound a behavior's policies allow at second `t`.
///
/// Returns `None` when the behavior has no policies (no rate limit) or
/// `direction` is [`ScaleDirection::None`]. A `Disabled` behavior bounds
/// the move to `current_pods`.
///
/// Bounds are relative to the replicas seen a period ago, not to
/// `current_pods`, so after a recent jump an up-bound can sit below the
/// current count (and a down-bound above it).
pub fn bound(
    behavior: &BehaviorParams,
    direction: ScaleDirection,
    current_pods: u32,
    t: i64,
    pod_history: &History,
) -> Option<u32> {
    if direction == ScaleDirection::None {
        return None;
    }
    if behavior.select_policy == SelectPolicy::Disabled {
        return Some(current_pods);
    }

    let candidates = behavior.policies.iter().map(|policy| {
        let period = i64::try_from(policy.period_seconds).unwrap_or(i64::MAX);
        let reference = pod_history.at(t.saturating_sub(period));
        let amount = limit_amount(policy, reference);
        match direction {
            ScaleDirection::Up => reference.saturating_add(amount),
            _ => reference.saturating_sub(amount),
        }
    });

    // Max = most permissive, Min = most restrictive. For scale-down the
    // permissive bound is the smallest one.
    let take_largest = matches!(
        (direction, behavior.select_policy),
        (ScaleDirection::Up, SelectPolicy::Max) | (ScaleDirection::Down, SelectPolicy::Min)
    );
    if take_largest {
        candidates.max()
    } else {
        candidates.min()
    }
}

/// Clamp `recommendation` against the behavior's bound.
pub fn limit(
    behavior: &BehaviorParams,
    direction: ScaleDirection,
    recommendation: u32,
    current_pods: u32,
    t: i64,
    pod_history: &History,
) -> u32 {
    match bound(behavior, direction, current_pods, t, pod_history) {
        Some(b) if direction == ScaleDirection::Up => recommendation.min(b),
        Some(b) => recommendation.max(b),
        None => recommendation,
    }
}
