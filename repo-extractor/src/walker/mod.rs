//! Extracted tree walk and JSONL emission.
//!
//! [`Walker`] lazily classifies every regular file under a root as text,
//! binary or unreadable. [`write_jsonl`] streams those records to disk, one
//! JSON object per line.

mod error;
mod language;
mod record;

pub use error::WalkError;
pub use language::{language_for, DEFAULT_LANGUAGE};
pub use record::{FileMetadata, FileRecord};

use crate::progress::ProgressSink;
use crate::summary::WalkSummary;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Relative path prefixes that are never emitted.
pub const EXCLUDED_PREFIXES: &[&str] = &[".git/", "node_modules/", ".env"];

/// Returns true if `relative_path` starts with an excluded prefix.
#[must_use]
pub fn is_excluded(relative_path: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| relative_path.starts_with(prefix))
}

/// Single-pass iterator of [`FileRecord`]s under a root directory.
///
/// Entries are visited in file name order. Directory symlinks are not
/// descended into. A symlink to a regular file inside the root is read
/// through and reported under the link's own path; any other symlink is
/// skipped.
pub struct Walker {
    root: PathBuf,
    canonical_root: PathBuf,
    entries: walkdir::IntoIter,
    skipped: usize,
}

impl Walker {
    /// Starts a walk rooted at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            canonical_root: fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()),
            entries: WalkDir::new(root).sort_by_file_name().into_iter(),
            skipped: 0,
        }
    }

    /// Number of files skipped so far: excluded prefixes and symlinks that
    /// do not resolve to a file inside the root.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Whether the symlink at `path` points at a regular file inside the root.
    fn link_stays_inside(&self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(target) => target.starts_with(&self.canonical_root) && target.is_file(),
            Err(_) => false,
        }
    }
}

impl Iterator for Walker {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let relative = e
                        .path()
                        .map(|path| relative_path(&self.root, path))
                        .unwrap_or_default();
                    if is_excluded(&relative) {
                        continue;
                    }
                    warn!(path = %relative, error = %e, "Failed to read directory entry");
                    return Some(FileRecord::error(&relative, e));
                }
            };

            let file_type = entry.file_type();
            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }

            let relative = relative_path(&self.root, entry.path());
            if is_excluded(&relative) {
                debug!(path = %relative, "Skipping excluded file");
                self.skipped += 1;
                continue;
            }

            if file_type.is_symlink() && !self.link_stays_inside(entry.path()) {
                warn!(path = %relative, "Skipping symlink that does not resolve to a file in the tree");
                self.skipped += 1;
                continue;
            }

            return Some(classify(entry.path(), &relative));
        }
    }
}

/// Reads one file and classifies it.
fn classify(path: &Path, relative: &str) -> FileRecord {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(content) => FileRecord::text(&name, relative, language_for(path), content),
            Err(_) => FileRecord::binary(&name, relative),
        },
        Err(e) => {
            warn!(path = %relative, error = %e, "Failed to read file");
            FileRecord::error(relative, e)
        }
    }
}

/// `path` relative to `root`, joined with `/` on every platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walks `root` and writes one JSON line per record to `output_path`.
///
/// Each record is serialized as soon as it is classified, followed by a tick
/// on `sink`. `cancel` is checked before every file; on cancellation the
/// lines written so far stay on disk.
///
/// # Errors
///
/// Returns [`WalkError::Io`] if the output cannot be written and
/// [`WalkError::Cancelled`] if `cancel` fires.
pub fn write_jsonl(
    root: &Path,
    output_path: &Path,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<WalkSummary, WalkError> {
    let io_error = |source| WalkError::Io {
        path: output_path.display().to_string(),
        source,
    };

    let file = File::create(output_path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let mut summary = WalkSummary::default();
    let mut walker = Walker::new(root);

    info!(root = %root.display(), output = %output_path.display(), "Writing contents");

    loop {
        // Checked before the next file is read.
        if cancel.is_cancelled() {
            writer.flush().map_err(io_error)?;
            return Err(WalkError::Cancelled);
        }
        let Some(record) = walker.next() else {
            break;
        };

        serde_json::to_writer(&mut writer, &record).map_err(|source| WalkError::Json {
            path: record.path().to_string(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_error)?;

        summary.record(&record);
        sink.on_tick();
    }

    writer.flush().map_err(io_error)?;
    summary.skipped = walker.skipped();

    info!(
        records = summary.records(),
        skipped = summary.skipped,
        "Finished writing contents"
    );
    Ok(summary)
}
