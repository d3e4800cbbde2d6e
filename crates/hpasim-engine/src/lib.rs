//! hpasim-engine — a discrete-time model of the Kubernetes HPA v2
//! controlling a queue-processing workload.
//!
//! # Tick
//!
//! ```text
//! for t in 0..=simulation_seconds:
//!     pods.tick()                       pending pods past their startup delay become ready
//!     flow = physics::step(queue, ready)  arrivals, processing, latency
//!     if t % HPA_SYNC_PERIOD_SECS == 0:
//!         raw        = clamp(ceil(pods × metric / target))   outside tolerance
//!         stabilized = window min (up) / max (down) of raw history
//!         effective  = clamp(limit(stabilized, policies))
//!     else:
//!         repeat last decision
//!     pods.scale_to(effective)          new pods start pending
//!     record point
//! ```
//!
//! The engine is pure: [`run_simulation`] never fails and never performs
//! I/O. Invalid configuration is normalized with defaults first.

pub mod history;
pub mod lifecycle;
pub mod physics;
pub mod policy;
pub mod scaler;
pub mod simulation;
pub mod summary;
pub mod sweep;

pub use scaler::{Autoscaler, Decision, HPA_SYNC_PERIOD_SECS};
pub use simulation::{run_simulation, Simulation};
pub use summary::summarize;
pub use sweep::{run_sweep, SweepOutcome, Variant};
