//! Archive unpacking error types.

use thiserror::Error;

/// Errors that can occur while unpacking an archive.
#[derive(Debug, Error)]
pub enum UnpackError {
    /// Failed to write the archive or list the scratch directory.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a readable zip archive.
    #[error("Failed to extract archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Extraction produced no top-level directory.
    #[error("empty archive")]
    EmptyArchive,
}
