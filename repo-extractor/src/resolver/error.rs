//! Repository reference parsing errors.

use thiserror::Error;

/// Errors that can occur while resolving a repository reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The input did not match any accepted repository shape.
    #[error("Invalid GitHub repository URL: '{input}'")]
    InvalidUrl { input: String },
}
