//! Settings file loading.
//!
//! Settings are optional TOML defaults for the CLI and GUI front ends. They
//! are only ever read; nothing is written back.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::ExtractorSettings;

use std::path::Path;
use tracing::{debug, info};

/// Loads and validates a settings file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` does not exist, and the
/// read, parse or validation error otherwise.
pub fn load_settings(path: &Path) -> Result<ExtractorSettings, ConfigError> {
    info!(path = %path.display(), "Loading settings");

    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings = ExtractorSettings::from_toml(&content, &path.display().to_string())?;
    debug!(?settings, "Loaded settings");
    Ok(settings)
}
