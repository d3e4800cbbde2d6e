//! Error types for loading simulator configuration.

use thiserror::Error;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading a configuration document.
///
/// Only structural problems surface here. Out-of-range or non-numeric
/// values are never errors; the normalizer substitutes defaults for them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to render TOML config: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
}
