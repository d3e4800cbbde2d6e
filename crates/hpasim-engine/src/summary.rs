//! Summary aggregation over a finished run.

use hpasim_core::{SimulationPoint, Summary};

/// Reduce a point sequence to headline statistics.
///
/// Scale events are counted from the points themselves: a point whose
/// effective replica count differs from its `pods` is a tick where a
/// change was applied. An empty sequence reports `starting_pods` as the
/// final replica count and zero for everything else.
pub fn summarize(points: &[SimulationPoint], starting_pods: u32) -> Summary {
    let Some(last) = points.last() else {
        return Summary {
            max_metric_value: 0.0,
            max_queue_jobs: 0.0,
            final_pods: starting_pods,
            final_queue_jobs: 0.0,
            total_scale_ups: 0,
            total_scale_downs: 0,
        };
    };

    let mut max_metric_value = f64::MIN;
    let mut max_queue_jobs = f64::MIN;
    let mut total_scale_ups = 0;
    let mut total_scale_downs = 0;
    for p in points {
        max_metric_value = max_metric_value.max(p.metric_value);
        max_queue_jobs = max_queue_jobs.max(p.queue_jobs);
        if p.desired_replicas_effective > p.pods {
            total_scale_ups += 1;
        } else if p.desired_replicas_effective < p.pods {
            total_scale_downs += 1;
        }
    }

    Summary {
        max_metric_value,
        max_queue_jobs,
        final_pods: last.pods,
        final_queue_jobs: last.queue_jobs,
        total_scale_ups,
        total_scale_downs,
    }
}
