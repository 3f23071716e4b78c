//! The running channel.
//!
//! [`Ipc::start`] wires the pieces together: it creates the directories,
//! subscribes to the requests directory, queues the files that were already
//! there, and spawns the worker. The returned [`RequestQueue`] is the only
//! way requests come out; responses go back through [`Ipc::write_response`].

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gslink_core::RequestId;

use crate::config::IpcConfig;
use crate::errors::{IpcError, ResponseError, Result};
use crate::queue::{self, RequestQueue};
use crate::response::ResponseWriter;
use crate::watcher::{DirectoryWatcher, RawEvent, RawEventKind, existing_requests};
use crate::worker::Worker;

/// Handle to a running channel.
///
/// Dropping it closes the channel. Requests already in the queue stay
/// receivable after close.
#[derive(Debug)]
pub struct Ipc {
    config: IpcConfig,
    responses: ResponseWriter,
    shutdown: CancellationToken,
    watcher: Mutex<Option<DirectoryWatcher>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Ipc {
    /// Bring the channel up under `config.base_dir`.
    ///
    /// Must be called from within a tokio runtime; the worker is spawned on
    /// it. Request files present before the call are delivered first,
    /// oldest first.
    pub fn start(config: &IpcConfig) -> Result<(Self, RequestQueue)> {
        let runtime = Handle::try_current().map_err(|_| IpcError::NoRuntime)?;

        let requests_dir = config.requests_dir();
        let responses_dir = config.responses_dir();
        for dir in [&requests_dir, &responses_dir] {
            std::fs::create_dir_all(dir).map_err(|source| IpcError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        // subscribe before listing so nothing written in between is lost
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let watcher = DirectoryWatcher::start(&requests_dir, events_tx.clone())?;
        let backlog = existing_requests(&requests_dir)?;
        if !backlog.is_empty() {
            info!(count = backlog.len(), "picking up request files from a previous run");
        }
        for path in backlog {
            let _ = events_tx.send(RawEvent::new(path, RawEventKind::Written));
        }
        // from here on only the watcher holds a sender
        drop(events_tx);

        let (sender, queue) = queue::channel();
        let shutdown = CancellationToken::new();
        let worker = Worker::new(events_rx, sender, shutdown.clone(), config.remove_processed);
        let handle = runtime.spawn(worker.run());

        info!(base_dir = ?config.base_dir, "ipc channel started");
        let ipc = Self {
            config: config.clone(),
            responses: ResponseWriter::new(responses_dir),
            shutdown,
            watcher: Mutex::new(Some(watcher)),
            worker: Mutex::new(Some(handle)),
        };
        Ok((ipc, queue))
    }

    /// Stop watching and stop the worker. Idempotent.
    ///
    /// The request queue reports `None` once its remaining requests are
    /// drained. Responses can still be written after close.
    pub fn close(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        let _ = self.watcher.lock().take();
        info!("ipc channel closed");
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Wait for the worker task to finish. Returns immediately if it
    /// already has, or if another caller is waiting on it.
    pub async fn closed(&self) {
        let handle = self.worker.lock().take();
        let Some(handle) = handle else {
            return;
        };
        if let Err(error) = handle.await {
            warn!(%error, "ipc worker ended abnormally");
        }
        debug!("ipc worker joined");
    }

    /// Publish `payload` as the response to `id`.
    pub fn write_response<T>(&self, id: &RequestId, payload: &T) -> std::result::Result<PathBuf, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        self.responses.write(id, payload)
    }

    /// [`write_response`](Self::write_response) without blocking the runtime.
    pub async fn write_response_async<T>(
        &self,
        id: &RequestId,
        payload: &T,
    ) -> std::result::Result<PathBuf, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        self.responses.write_async(id, payload).await
    }

    /// A writer that can outlive borrows of `self`, for handing to tasks.
    pub fn responses(&self) -> ResponseWriter {
        self.responses.clone()
    }

    /// Configuration the channel was started with.
    pub fn config(&self) -> &IpcConfig {
        &self.config
    }

    /// Directory watched for requests.
    pub fn requests_dir(&self) -> PathBuf {
        self.config.requests_dir()
    }

    /// Directory responses are published to.
    pub fn responses_dir(&self) -> &Path {
        self.responses.dir()
    }
}

impl Drop for Ipc {
    fn drop(&mut self) {
        self.close();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
