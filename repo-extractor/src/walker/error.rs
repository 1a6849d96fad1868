//! Output writing error types.

use thiserror::Error;

/// Errors that abort writing the JSONL document.
///
/// Failures reading individual files are not errors; they become
/// [`super::FileRecord::Error`] lines.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Failed to create or write the output file.
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a record.
    #[error("Failed to serialize record for '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The walk was cancelled between files.
    #[error("Walk cancelled")]
    Cancelled,
}
