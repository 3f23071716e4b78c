//! Write stabilizer.
//!
//! The game writes request files in several system calls, so a reader can
//! see an empty or half-written file. Each notification for a file triggers
//! one read; the file counts as complete the first time its content parses
//! as JSON. Incomplete content is not an error: a later notification for
//! the rest of the write retries it. There is no timer.
//!
//! Per-file states are `unseen` (no entry), [`FileState::Pending`] and
//! [`FileState::Delivered`]. A delivered file is not read again until it is
//! removed or replaced by a different file. Some backends report one rename
//! into the directory as several create notifications, so a create only
//! resets a delivered entry when the file's [`FileStamp`] changed.

use std::collections::HashMap;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;
use tracing::trace;

/// Tracking state of one request file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileState {
    /// Seen, but its content has not parsed yet.
    Pending,
    /// Parsed once and handed on; further writes are ignored.
    Delivered,
}

/// Identity of a file on disk, compared to tell a repeated notification
/// from a replaced file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStamp {
    #[cfg(unix)]
    ino: u64,
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    /// Stamp of the file described by `meta`.
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            #[cfg(unix)]
            ino: std::os::unix::fs::MetadataExt::ino(meta),
            len: meta.len(),
            modified: meta.modified().ok(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    state: FileState,
    stamp: Option<FileStamp>,
}

/// Per-filename completion tracker.
#[derive(Debug, Default)]
pub struct WriteStabilizer {
    files: HashMap<PathBuf, Entry>,
}

impl WriteStabilizer {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `path`, `None` if unseen.
    pub fn state(&self, path: &Path) -> Option<FileState> {
        self.files.get(path).map(|e| e.state)
    }

    /// Whether a read of `path` could still produce a delivery.
    pub fn wants_read(&self, path: &Path) -> bool {
        self.state(path) != Some(FileState::Delivered)
    }

    /// Forget `path` (removed or recreated), returning it to `unseen`.
    pub fn forget(&mut self, path: &Path) {
        let _ = self.files.remove(path);
    }

    /// A create notification for `path`, with the stamp of whatever is at
    /// `path` now (`None` if it is gone).
    ///
    /// Returns `path` to `unseen` unless it was delivered and still carries
    /// the stamp recorded at delivery.
    pub fn created(&mut self, path: &Path, stamp: Option<FileStamp>) {
        let unchanged = stamp.is_some()
            && self
                .files
                .get(path)
                .is_some_and(|e| e.state == FileState::Delivered && e.stamp == stamp);
        if unchanged {
            trace!(?path, "repeated create for a delivered file");
            return;
        }
        self.forget(path);
    }

    /// Remember the stamp of a delivered file.
    pub fn stamp_delivered(&mut self, path: &Path, stamp: FileStamp) {
        if let Some(entry) = self
            .files
            .get_mut(path)
            .filter(|e| e.state == FileState::Delivered)
        {
            entry.stamp = Some(stamp);
        }
    }

    /// Record the outcome of reading `path` after a notification.
    ///
    /// Returns the parsed document exactly once per file: on the first read
    /// that yields valid JSON. Unreadable or incomplete content leaves the
    /// file pending.
    pub fn observe(&mut self, path: &Path, content: io::Result<Vec<u8>>) -> Option<Value> {
        if !self.wants_read(path) {
            return None;
        }

        let parsed = match content {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).map_err(|error| {
                trace!(?path, len = bytes.len(), %error, "request file incomplete");
            }),
            Err(error) => {
                trace!(?path, %error, "request file not readable yet");
                Err(())
            }
        };

        let (state, value) = match parsed {
            Ok(value) => (FileState::Delivered, Some(value)),
            Err(()) => (FileState::Pending, None),
        };
        let _ = self
            .files
            .insert(path.to_path_buf(), Entry { state, stamp: None });
        value
    }

    /// Number of files currently tracked.
    pub fn tracked(&self) -> usize {
        self.files.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
