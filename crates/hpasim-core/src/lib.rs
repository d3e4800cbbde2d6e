//! hpasim-core — configuration and result types for the HPA simulator.
//!
//! # Architecture
//!
//! ```text
//! SimulatorConfig (requested, possibly partial/invalid)
//!   └── normalize() → Parameters (every field defined and in range)
//!
//! SimulationResult
//!   ├── points: Vec<SimulationPoint>   one per simulated second
//!   ├── summary: Summary               headline statistics
//!   └── parameters: Parameters         what the run actually used
//! ```
//!
//! Configuration documents are camelCase TOML or JSON. Numeric fields are
//! read leniently: a value of the wrong type is treated as absent and
//! replaced by its default during normalization.

pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use normalize::{normalize, BehaviorParams, Parameters, PolicyParams, Substitution};
pub use types::*;
