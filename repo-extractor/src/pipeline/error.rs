//! Pipeline error types.

use super::Stage;
use crate::fetcher::FetchError;
use crate::resolver::ResolveError;
use crate::unpacker::UnpackError;
use crate::walker::WalkError;
use thiserror::Error;

/// Errors that end an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input was not a repository reference.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The archive could not be downloaded.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The archive could not be unpacked.
    #[error(transparent)]
    Unpack(#[from] UnpackError),

    /// The output document could not be written.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// The run's scratch directory could not be created.
    #[error("Failed to create scratch directory: {0}")]
    ScratchDirectory(#[source] std::io::Error),

    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be built.
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The run was cancelled between stages.
    #[error("Extraction cancelled while {stage}")]
    Cancelled { stage: Stage },

    /// A blocking task panicked or was aborted.
    #[error("Background task failed while {stage}: {message}")]
    Worker { stage: Stage, message: String },
}

impl ExtractError {
    /// Stage the error ended the run in.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Resolve(_) => Stage::Resolving,
            Self::Fetch(_) | Self::ScratchDirectory(_) => Stage::Fetching,
            Self::Unpack(_) => Stage::Unpacking,
            Self::Walk(_) | Self::OutputDirectory { .. } => Stage::Walking,
            Self::InvalidBaseUrl { .. } | Self::HttpClient(_) => Stage::Idle,
            Self::Cancelled { stage } | Self::Worker { stage, .. } => *stage,
        }
    }

    /// Returns true if the run stopped because it was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled { .. } | Self::Walk(WalkError::Cancelled)
        )
    }

    /// Single stage-attributed line suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("{} failed: {self}", self.stage().label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_errors_to_stages() {
        let not_found = ExtractError::from(FetchError::NotFound {
            repository: "a/b".to_string(),
        });
        assert_eq!(not_found.stage(), Stage::Fetching);
        assert!(not_found.user_message().starts_with("Download failed: "));

        let empty = ExtractError::from(UnpackError::EmptyArchive);
        assert_eq!(empty.stage(), Stage::Unpacking);
        assert_eq!(empty.user_message(), "Archive extraction failed: empty archive");
    }

    #[test]
    fn recognizes_cancellation() {
        assert!(ExtractError::from(WalkError::Cancelled).is_cancelled());
        assert!(ExtractError::Cancelled {
            stage: Stage::Fetching
        }
        .is_cancelled());
        assert!(!ExtractError::from(UnpackError::EmptyArchive).is_cancelled());
    }
}
