//! Settings error types.

use thiserror::Error;

/// Errors that can occur while loading a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file does not exist.
    #[error("Settings file not found: {path}")]
    NotFound { path: String },

    /// The settings file could not be read.
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has unknown keys.
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting has an unusable value.
    #[error("Invalid '{key}' in '{path}': {message}")]
    Invalid {
        path: String,
        key: &'static str,
        message: String,
    },
}
