//! Per-second history buffers used for lookback decisions.
//!
//! A buffer is pre-filled with a steady-state value covering the longest
//! lookback the run can request, so reads at negative offsets see the
//! state the workload was in before `t = 0` instead of running off the
//! start of the buffer.
//!
//! The pre-fill is constant, so a read older than the pre-fill is clamped
//! to its oldest entry without changing the answer. That lets the horizon
//! stop at the run length (or [`MAX_PREFILL`]) for windows longer than
//! the run.

/// Upper bound on pre-filled entries.
pub const MAX_PREFILL: u64 = 86_400;

/// Upper bound on the live-sample capacity reserved up front.
const MAX_PREALLOC: u64 = 86_400;

/// Append-only sequence of replica counts indexed by simulated second.
#[derive(Debug, Clone)]
pub struct History {
    samples: Vec<u32>,
    /// Number of pre-filled entries standing in for `t < 0`.
    horizon: usize,
}

impl History {
    /// Create a buffer whose pre-fill covers lookbacks of up to
    /// `max_lookback` seconds, with room for `seconds` live samples.
    pub fn new(steady_state: u32, max_lookback: u64, seconds: u64) -> Self {
        let horizon = (max_lookback.min(seconds).min(MAX_PREFILL) + 1) as usize;
        let live = (seconds.min(MAX_PREALLOC) + 1) as usize;
        let mut samples = Vec::with_capacity(horizon + live);
        samples.resize(horizon, steady_state);
        Self { samples, horizon }
    }

    /// Record the value for the next second.
    pub fn push(&mut self, value: u32) {
        self.samples.push(value);
    }

    /// Number of live (non pre-filled) samples.
    pub fn len(&self) -> usize {
        self.samples.len() - self.horizon
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value recorded for second `t`.
    ///
    /// Reads past the newest sample return the newest sample; reads before
    /// the pre-fill return the oldest one.
    pub fn at(&self, t: i64) -> u32 {
        let idx = t.saturating_add(self.horizon as i64).max(0) as usize;
        let idx = idx.min(self.samples.len() - 1);
        self.samples[idx]
    }

    /// Values for seconds `t - to ..= t - from`, newest first.
    pub fn trailing(&self, t: i64, from: u64, to: u64) -> impl Iterator<Item = u32> + '_ {
        // Offsets past the oldest pre-filled entry all read the same value.
        let oldest = (t.max(0) as u64).saturating_add(self.horizon as u64);
        (from..=to.min(oldest)).map(move |offset| self.at(t.saturating_sub(offset as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_offsets_read_steady_state() {
        let mut h = History::new(10, 300, 5);
        h.push(12);
        assert_eq!(h.at(-1), 10);
        assert_eq!(h.at(-300), 10);
        assert_eq!(h.at(0), 12);
    }

    #[test]
    fn reads_before_prefill_clamp_to_oldest() {
        let h = History::new(7, 5, 0);
        assert_eq!(h.at(-1_000), 7);
        assert_eq!(h.at(i64::MIN), 7);
    }

    #[test]
    fn reads_past_newest_clamp_to_newest() {
        let mut h = History::new(3, 10, 2);
        assert_eq!(h.at(0), 3);
        h.push(4);
        h.push(5);
        assert_eq!(h.at(1), 5);
        assert_eq!(h.at(50), 5);
    }

    #[test]
    fn horizon_longer_than_run_reads_steady_state() {
        let mut h = History::new(9, u64::MAX, 30);
        h.push(4);
        assert_eq!(h.at(-1), 9);
        assert_eq!(h.at(-1_000_000), 9);
        assert_eq!(h.at(0), 4);
    }

    #[test]
    fn grows_one_entry_per_push() {
        let mut h = History::new(1, 60, 3);
        assert!(h.is_empty());
        for i in 0..3 {
            h.push(i);
            assert_eq!(h.len(), i as usize + 1);
        }
    }

    #[test]
    fn trailing_is_newest_first() {
        let mut h = History::new(0, 4, 3);
        h.push(1);
        h.push(2);
        h.push(3);
        let window: Vec<u32> = h.trailing(2, 0, 3).collect();
        assert_eq!(window, vec![3, 2, 1, 0]);

        let exclusive: Vec<u32> = h.trailing(2, 1, 2).collect();
        assert_eq!(exclusive, vec![2, 1]);
    }
}
