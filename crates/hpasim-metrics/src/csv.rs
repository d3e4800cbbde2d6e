//! Per-second CSV time series.
//!
//! One row per [`SimulationPoint`], one column per field, using the same
//! camelCase names as the JSON output.

use hpasim_core::SimulationPoint;

pub const CSV_HEADER: &str = "t,pods,readyPods,queueJobs,latency,metricValue,processedJobs,\
desiredReplicasRaw,desiredReplicasEffective,scaleDirection";

/// Render `points` as CSV with a header row.
pub fn render_csv(points: &[SimulationPoint]) -> String {
    let mut out = String::with_capacity((points.len() + 1) * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for p in points {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            p.t,
            p.pods,
            p.ready_pods,
            p.queue_jobs,
            p.latency,
            p.metric_value,
            p.processed_jobs,
            p.desired_replicas_raw,
            p.desired_replicas_effective,
            p.scale_direction.as_str(),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpasim_core::ScaleDirection;

    fn point(t: u64) -> SimulationPoint {
        SimulationPoint {
            t,
            pods: 10,
            ready_pods: 8,
            queue_jobs: 115.0,
            latency: 0.14375,
            metric_value: 0.14375,
            processed_jobs: 800.0,
            desired_replicas_raw: 2,
            desired_replicas_effective: 10,
            scale_direction: ScaleDirection::Down,
        }
    }

    #[test]
    fn empty_points_render_header_only() {
        assert_eq!(render_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn one_row_per_point() {
        let csv = render_csv(&[point(0), point(1)]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,10,8,115,0.14375,0.14375,800,2,10,down");
        assert!(lines[2].starts_with("1,"));
    }

    #[test]
    fn header_matches_column_count() {
        let csv = render_csv(&[point(0)]);
        let mut lines = csv.lines();
        let header = lines.next().unwrap().split(',').count();
        let row = lines.next().unwrap().split(',').count();
        assert_eq!(header, 10);
        assert_eq!(row, header);
    }
}
