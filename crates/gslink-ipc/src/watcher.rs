//! Directory watcher for the requests directory.
//!
//! Wraps a non-recursive `notify` watcher and reduces its platform-specific
//! events to [`RawEvent`]s for request files only. This is the only module
//! that sees raw filesystem notifications.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};

use crate::config::is_request_file;
use crate::errors::{IpcError, Result};

/// What happened to a request file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawEventKind {
    /// The file appeared (created, or renamed into the directory).
    Created,
    /// The file's content may have changed.
    Written,
    /// The file is gone (deleted, or renamed away).
    Removed,
}

/// A filesystem notification for one request file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    /// Full path of the request file.
    pub path: PathBuf,
    /// Event kind.
    pub kind: RawEventKind,
}

impl RawEvent {
    /// Convenience constructor.
    pub fn new(path: impl Into<PathBuf>, kind: RawEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Live subscription to the requests directory. Dropping it stops the
/// notifications and releases the event sender.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    dir: PathBuf,
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl DirectoryWatcher {
    /// Start watching `dir`, forwarding request-file events to `events`.
    ///
    /// The subscription is active when this returns, so files written
    /// afterwards are never missed. Files written before it should be
    /// picked up with [`existing_requests`].
    pub fn start(dir: &Path, events: UnboundedSender<RawEvent>) -> Result<Self> {
        let handler = move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for raw in classify(&event) {
                    trace!(path = ?raw.path, kind = ?raw.kind, "request file event");
                    // receiver gone means the worker stopped
                    let _ = events.send(raw);
                }
            }
            Err(error) => warn!(%error, "request watcher error"),
        };

        let mut watcher =
            RecommendedWatcher::new(handler, NotifyConfig::default()).map_err(|source| {
                IpcError::Watch {
                    path: dir.to_path_buf(),
                    source,
                }
            })?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| IpcError::Watch {
                path: dir.to_path_buf(),
                source,
            })?;

        debug!(?dir, "watching requests directory");
        Ok(Self {
            _watcher: watcher,
            dir: dir.to_path_buf(),
        })
    }

    /// The watched directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Reduce a `notify` event to request-file events.
///
/// Metadata-only changes and reads are dropped. A close after writing is
/// reported as a write, since it is often the last event of a write burst.
pub fn classify(event: &Event) -> Vec<RawEvent> {
    use RawEventKind::{Created, Removed, Written};

    let pairs: Vec<(&PathBuf, RawEventKind)> = match event.kind {
        EventKind::Create(_) => event.paths.iter().map(|p| (p, Created)).collect(),
        EventKind::Remove(_) => event.paths.iter().map(|p| (p, Removed)).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.iter().map(|p| (p, Removed)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().map(|p| (p, Created)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            // paths are [from, to]
            let mut pairs = Vec::with_capacity(2);
            if let Some(from) = event.paths.first() {
                pairs.push((from, Removed));
            }
            if let Some(to) = event.paths.get(1) {
                pairs.push((to, Created));
            }
            pairs
        }
        EventKind::Modify(ModifyKind::Name(_)) => event
            .paths
            .iter()
            .map(|p| (p, if p.exists() { Created } else { Removed }))
            .collect(),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) | EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            event.paths.iter().map(|p| (p, Written)).collect()
        }
        EventKind::Access(_) => Vec::new(),
        EventKind::Any | EventKind::Other => event
            .paths
            .iter()
            .map(|p| (p, if p.exists() { Written } else { Removed }))
            .collect(),
    };

    pairs
        .into_iter()
        .filter(|(path, _)| is_request_file(path))
        .map(|(path, kind)| RawEvent::new(path.clone(), kind))
        .collect()
}

/// Request files already present in `dir`, oldest first (ties by name).
pub fn existing_requests(dir: &Path) -> Result<Vec<PathBuf>> {
    let list_err = |source| IpcError::ListRequests {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if !is_request_file(&path) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((modified, path));
    }
    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
