//! Extraction result types.

use super::WalkSummary;
use crate::pipeline::{ExtractError, Stage};
use crate::resolver::RepositoryReference;
use serde::Serialize;
use std::path::PathBuf;

/// Details of a successful extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Repository that was extracted.
    pub repository: RepositoryReference,

    /// Branch reference whose archive was downloaded.
    pub branch: String,

    /// Path of the written JSONL document.
    pub output_path: PathBuf,

    /// Record counts.
    pub summary: WalkSummary,
}

/// Outcome handed to GUI and CLI callers.
#[derive(Debug, Clone)]
pub enum ExtractionResult {
    /// The document was written.
    Success {
        /// Path of the written JSONL document.
        output_path: PathBuf,
        /// Record counts.
        summary: WalkSummary,
    },

    /// The run stopped at `stage`.
    Failed {
        /// Stage that failed.
        stage: Stage,
        /// Stage-attributed message for display.
        message: String,
    },
}

impl ExtractionResult {
    /// Returns true if the document was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The output path on success, the error message on failure.
    #[must_use]
    pub fn path_or_error(&self) -> String {
        match self {
            Self::Success { output_path, .. } => output_path.display().to_string(),
            Self::Failed { message, .. } => message.clone(),
        }
    }
}

impl From<ExtractError> for ExtractionResult {
    fn from(error: ExtractError) -> Self {
        Self::Failed {
            stage: error.stage(),
            message: error.user_message(),
        }
    }
}

impl From<Result<ExtractionReport, ExtractError>> for ExtractionResult {
    fn from(result: Result<ExtractionReport, ExtractError>) -> Self {
        match result {
            Ok(report) => Self::Success {
                output_path: report.output_path,
                summary: report.summary,
            },
            Err(error) => error.into(),
        }
    }
}
