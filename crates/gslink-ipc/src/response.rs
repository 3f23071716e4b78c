//! Response writer.
//!
//! A response is encoded as compact JSON, written to a hidden temporary file
//! in the responses directory and renamed onto `<id>.json`. The rename is
//! atomic within one directory, so the game never reads a partial response.
//! An existing response for the same id is replaced.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use gslink_core::RequestId;

use crate::errors::ResponseError;

/// Publishes responses into one directory. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ResponseWriter {
    dir: Arc<Path>,
}

impl ResponseWriter {
    /// Writer for `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir: PathBuf = dir.into();
        Self {
            dir: Arc::from(dir),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of the response for `id`.
    pub fn path_for(&self, id: &RequestId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Encode `payload` and publish it as the response to `id`.
    ///
    /// Returns the path of the published file. Nothing is retried on failure.
    /// Blocks on file I/O; async callers use [`write_async`](Self::write_async).
    pub fn write<T>(&self, id: &RequestId, payload: &T) -> Result<PathBuf, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        validate_id(id)?;
        let data = serde_json::to_vec(payload)?;
        self.publish(id, &data)
    }

    /// [`write`](Self::write) with the file I/O on tokio's blocking pool.
    pub async fn write_async<T>(&self, id: &RequestId, payload: &T) -> Result<PathBuf, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        validate_id(id)?;
        let data = serde_json::to_vec(payload)?;
        let writer = self.clone();
        let id = id.clone();
        tokio::task::spawn_blocking(move || writer.publish(&id, &data)).await?
    }

    fn publish(&self, id: &RequestId, data: &[u8]) -> Result<PathBuf, ResponseError> {
        let path = self.path_for(id);
        let io_err = |source| ResponseError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        tmp.write_all(data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        let _ = tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(%id, ?path, bytes = data.len(), "response written");
        Ok(path)
    }
}

/// Reject ids that would escape the responses directory or name no file.
fn validate_id(id: &RequestId) -> Result<(), ResponseError> {
    let s = id.as_str();
    let bad = s.is_empty()
        || s == "."
        || s == ".."
        || s.contains(['/', '\\'])
        || s.contains('\0');
    if bad {
        return Err(ResponseError::InvalidId(s.to_owned()));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
