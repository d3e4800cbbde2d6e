//! Pod lifecycle — pending pods waiting out their startup delay.
//!
//! Requested replicas = ready + pending. Only ready pods add processing
//! capacity. Scale-down revokes pending pods (newest first) before it
//! touches ready ones.

use tracing::trace;

/// Pods requested on the same second; they become ready together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cohort {
    remaining: u64,
    count: u32,
}

/// Tracks which requested pods are ready and which are still starting.
#[derive(Debug, Clone)]
pub struct PodLifecycle {
    ready: u32,
    /// Pending requests, oldest first.
    pending: Vec<Cohort>,
    pending_count: u32,
    startup_delay: u64,
}

impl PodLifecycle {
    /// All `starting_pods` begin ready.
    pub fn new(starting_pods: u32, startup_delay: u64) -> Self {
        Self {
            ready: starting_pods,
            pending: Vec::new(),
            pending_count: 0,
            startup_delay,
        }
    }

    /// Requested replica count (ready + pending).
    pub fn total(&self) -> u32 {
        self.ready.saturating_add(self.pending_count)
    }

    pub fn ready(&self) -> u32 {
        self.ready
    }

    pub fn pending(&self) -> u32 {
        self.pending_count
    }

    /// Count down one second and promote pods whose delay has elapsed.
    ///
    /// Returns how many pods became ready.
    pub fn tick(&mut self) -> u32 {
        if self.pending.is_empty() {
            return 0;
        }
        let mut graduated = 0u32;
        self.pending.retain_mut(|cohort| {
            cohort.remaining = cohort.remaining.saturating_sub(1);
            if cohort.remaining == 0 {
                graduated = graduated.saturating_add(cohort.count);
                false
            } else {
                true
            }
        });
        self.pending_count -= graduated;
        self.ready = self.ready.saturating_add(graduated);
        graduated
    }

    /// Move the requested replica count to `target`.
    pub fn scale_to(&mut self, target: u32) {
        let current = self.total();
        if target > current {
            let added = target - current;
            self.pending.push(Cohort {
                remaining: self.startup_delay,
                count: added,
            });
            self.pending_count += added;
            trace!(added, delay = self.startup_delay, "pods pending");
        } else if target < current {
            let mut remove = current - target;
            let mut revoked = 0u32;
            while remove > 0 {
                let Some(newest) = self.pending.last_mut() else {
                    break;
                };
                let taken = newest.count.min(remove);
                newest.count -= taken;
                if newest.count == 0 {
                    self.pending.pop();
                }
                remove -= taken;
                revoked += taken;
            }
            self.pending_count -= revoked;
            self.ready = self.ready.saturating_sub(remove);
            trace!(revoked, terminated = remove, "pods removed");
        }
    }
}
