//! Channel configuration.

use std::path::{Path, PathBuf};

/// Subdirectory the game writes requests into.
pub const REQUESTS_DIR: &str = "requests";

/// Subdirectory responses are published to.
pub const RESPONSES_DIR: &str = "responses";

/// Where the channel lives and what happens to request files once handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpcConfig {
    /// Directory holding `requests/` and `responses/`.
    pub base_dir: PathBuf,
    /// Delete a request file once it has been delivered or dropped as
    /// malformed (default `true`). When `false`, processed files stay in
    /// place and are ignored until removed or recreated.
    pub remove_processed: bool,
}

impl IpcConfig {
    /// Configuration rooted at `base_dir` with default policies.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            remove_processed: true,
        }
    }

    /// Keep processed request files on disk.
    #[must_use]
    pub fn keep_processed(mut self) -> Self {
        self.remove_processed = false;
        self
    }

    /// `<base>/requests`
    pub fn requests_dir(&self) -> PathBuf {
        self.base_dir.join(REQUESTS_DIR)
    }

    /// `<base>/responses`
    pub fn responses_dir(&self) -> PathBuf {
        self.base_dir.join(RESPONSES_DIR)
    }
}

/// Whether `path` names a request file (`*.json`, not hidden).
pub fn is_request_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with('.'));
    let json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    json && !hidden
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
