//! Owner/name pair identifying a repository.

use serde::Serialize;
use std::fmt;

/// A repository on the archive host, identified by owner and name.
///
/// Only constructed through [`crate::resolve`], which guarantees both parts
/// are non-empty and free of separators and protocol characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    pub(crate) fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical browser URL, e.g. `https://github.com/owner/name`.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
