//! hpasim-metrics — export formats for simulation results.
//!
//! # Formats
//!
//! ```text
//! render_prometheus() → text exposition of run summaries, one
//!                       `scenario` label per run
//! render_csv()        → one row per simulated second
//! ```

pub mod csv;
pub mod prometheus;

pub use csv::{render_csv, CSV_HEADER};
pub use prometheus::{render_prometheus, ScenarioSummary};
