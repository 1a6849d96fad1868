//! Settings file contents.

use super::ConfigError;
use crate::pipeline::{ExtractorConfig, DEFAULT_OUTPUT_DIR};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Parsed contents of a settings TOML file.
///
/// Every key is optional; missing keys fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExtractorSettings {
    /// Directory the JSONL document is written to.
    pub output_dir: Option<PathBuf>,

    /// Archive host base URL.
    pub base_url: Option<String>,

    /// User agent sent with requests.
    pub user_agent: Option<String>,

    /// Overall request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Parent directory for per-run scratch directories.
    pub scratch_dir: Option<PathBuf>,
}

impl ExtractorSettings {
    /// Parses and validates settings from TOML text.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            source: e,
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    /// Validates field values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let invalid = |key: &'static str, message: String| ConfigError::Invalid {
            path: path.to_string(),
            key,
            message,
        };

        if let Some(base_url) = &self.base_url {
            let url = Url::parse(base_url)
                .map_err(|e| invalid("base-url", format!("'{base_url}' is not a valid URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid(
                    "base-url",
                    format!("'{base_url}' must use http or https"),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(invalid("timeout-secs", "must be greater than zero".to_string()));
        }

        if matches!(&self.user_agent, Some(agent) if agent.trim().is_empty()) {
            return Err(invalid("user-agent", "cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Output directory, or [`DEFAULT_OUTPUT_DIR`] if unset.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Builds an [`ExtractorConfig`] from the set fields.
    #[must_use]
    pub fn to_config(&self) -> ExtractorConfig {
        let mut config = ExtractorConfig::new();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(scratch_dir) = &self.scratch_dir {
            config = config.with_scratch_root(scratch_dir.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_settings() {
        let settings = ExtractorSettings::from_toml(
            r#"
output-dir = "extracted_repos"
base-url = "http://localhost:9000"
user-agent = "tests"
timeout-secs = 30
"#,
            "settings.toml",
        )
        .unwrap();

        assert_eq!(settings.output_dir(), PathBuf::from("extracted_repos"));

        let config = settings.to_config();
        assert_eq!(config.base_url(), "http://localhost:9000/");
        assert_eq!(config.user_agent(), "tests");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn empty_settings_use_defaults() {
        let settings = ExtractorSettings::from_toml("", "settings.toml").unwrap();

        assert_eq!(settings.output_dir(), PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.to_config(), ExtractorConfig::new());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = ExtractorSettings::from_toml("token = \"secret\"", "settings.toml");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn rejects_invalid_values() {
        for (content, expected_key) in [
            ("base-url = \"not a url\"", "base-url"),
            ("base-url = \"ftp://example.com/\"", "base-url"),
            ("timeout-secs = 0", "timeout-secs"),
            ("user-agent = \"  \"", "user-agent"),
        ] {
            match ExtractorSettings::from_toml(content, "settings.toml") {
                Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, expected_key),
                other => panic!("unexpected result for {content}: {other:?}"),
            }
        }
    }
}
