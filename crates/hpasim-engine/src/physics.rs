//! Queue physics — one second of arrivals and processing.

use hpasim_core::UNBOUNDED_LATENCY;

/// Outcome of one second of queue dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    /// Jobs per second the ready pods can process.
    pub capacity: f64,
    /// Latency observed at the start of the second.
    pub latency: f64,
    /// Jobs completed during the second.
    pub processed: f64,
    /// Queue depth carried into the next second.
    pub next_queue: f64,
}

/// Advance the queue by one second.
///
/// Latency is `queue / capacity`. With no ready capacity it is 0 for an
/// empty queue and [`UNBOUNDED_LATENCY`] otherwise.
pub fn step(queue: f64, ready_pods: u32, processing_rate_per_pod: f64, arrivals: f64) -> Flow {
    let capacity = ready_pods as f64 * processing_rate_per_pod;

    let latency = if capacity > 0.0 {
        queue / capacity
    } else if queue > 0.0 {
        UNBOUNDED_LATENCY
    } else {
        0.0
    };

    let processed = (queue + arrivals).min(capacity);
    let next_queue = (queue + arrivals - processed).max(0.0);

    Flow {
        capacity,
        latency,
        processed,
        next_queue,
    }
}
