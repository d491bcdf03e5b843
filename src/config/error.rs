//! Configuration error types.

/// Errors that can occur while reading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[source] toml::de::Error),
}
