//! Zip archive unpacking into a scratch directory.

mod error;

pub use error::UnpackError;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name the downloaded bytes are written to inside the scratch directory.
const ARCHIVE_FILE_NAME: &str = "archive.zip";

/// The top-level directory produced by unpacking an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTree {
    root: PathBuf,
}

impl ExtractedTree {
    /// Directory the file walk starts from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Writes `bytes` into `scratch`, extracts them as a zip archive and returns
/// the first top-level directory.
///
/// Archives from the host contain a single `{repo}-{branch}` directory, but
/// no particular name is assumed. When several directories exist, the first
/// in name order is used.
///
/// # Errors
///
/// Returns [`UnpackError::EmptyArchive`] if no directory was extracted, and
/// the I/O or zip error for any other failure.
pub fn unpack(bytes: &[u8], scratch: &Path) -> Result<ExtractedTree, UnpackError> {
    let archive_path = scratch.join(ARCHIVE_FILE_NAME);
    fs::write(&archive_path, bytes).map_err(|e| io_error(&archive_path, e))?;
    debug!(path = %archive_path.display(), bytes = bytes.len(), "Wrote archive");

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let entries = archive.len();
    archive.extract(scratch)?;
    info!(entries, scratch = %scratch.display(), "Extracted archive");

    let root = first_subdirectory(scratch)?.ok_or(UnpackError::EmptyArchive)?;
    debug!(root = %root.display(), "Located extracted tree");
    Ok(ExtractedTree { root })
}

fn first_subdirectory(dir: &Path) -> Result<Option<PathBuf>, UnpackError> {
    let mut directories = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let entry = entry.map_err(|e| io_error(dir, e))?;
        let file_type = entry.file_type().map_err(|e| io_error(&entry.path(), e))?;
        if file_type.is_dir() {
            directories.push(entry.path());
        }
    }

    directories.sort();
    Ok(directories.into_iter().next())
}

fn io_error(path: &Path, source: std::io::Error) -> UnpackError {
    UnpackError::Io {
        path: path.display().to_string(),
        source,
    }
}
