//! Extractor configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Host archives are downloaded from.
pub const DEFAULT_BASE_URL: &str = "https://github.com/";

/// Output directory used when the caller does not pick one.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Configuration for extraction runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Base URL archive paths are joined onto; always ends with `/`.
    base_url: String,
    /// User agent sent with every request.
    user_agent: String,
    /// Overall request timeout; `None` keeps the HTTP client default.
    request_timeout: Option<Duration>,
    /// Parent of per-run scratch directories; `None` uses the system temp dir.
    scratch_root: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("repo-extractor/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
            scratch_root: None,
        }
    }
}

impl ExtractorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive host. A trailing `/` is added if missing.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets an overall request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Places scratch directories under `scratch_root`.
    pub fn with_scratch_root(mut self, scratch_root: PathBuf) -> Self {
        self.scratch_root = Some(scratch_root);
        self
    }

    /// Returns the archive host base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Returns the scratch root, if any.
    pub fn scratch_root(&self) -> Option<&Path> {
        self.scratch_root.as_deref()
    }
}
