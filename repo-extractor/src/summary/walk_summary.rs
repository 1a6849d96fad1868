//! Walk summary types.

use crate::walker::FileRecord;
use serde::Serialize;

/// Counts of records written during a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    /// Number of `file` records.
    pub text_files: usize,

    /// Number of `binary` records.
    pub binary_files: usize,

    /// Number of `error` records.
    pub error_files: usize,

    /// Number of files skipped because of an excluded prefix, plus symlinks
    /// that do not resolve to a file inside the walked tree.
    pub skipped: usize,

    /// Total bytes of text content written.
    pub content_bytes: u64,
}

impl WalkSummary {
    /// Updates the summary with a written record.
    pub fn record(&mut self, record: &FileRecord) {
        match record {
            FileRecord::Text { content, .. } => {
                self.text_files += 1;
                self.content_bytes += content.len() as u64;
            }
            FileRecord::Binary { .. } => self.binary_files += 1,
            FileRecord::Error { .. } => self.error_files += 1,
        }
    }

    /// Number of lines written.
    #[must_use]
    pub fn records(&self) -> usize {
        self.text_files + self.binary_files + self.error_files
    }

    /// Returns true if any file could not be read.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_files > 0
    }
}
