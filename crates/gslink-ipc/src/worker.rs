//! Background worker: raw events in, typed requests out.
//!
//! One task owns the [`WriteStabilizer`] and the queue sender. For each
//! event it reads the file, waits for the content to become valid JSON,
//! classifies it, and enqueues the result. Problems with a single file are
//! logged and never stop the loop.

use std::path::Path;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gslink_core::parse_envelope;

use crate::queue::RequestSender;
use crate::stabilizer::{FileStamp, WriteStabilizer};
use crate::watcher::{RawEvent, RawEventKind};

/// Whether the loop should keep going.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub(crate) struct Worker {
    events: UnboundedReceiver<RawEvent>,
    queue: RequestSender,
    shutdown: CancellationToken,
    remove_processed: bool,
    stabilizer: WriteStabilizer,
}

impl Worker {
    pub(crate) fn new(
        events: UnboundedReceiver<RawEvent>,
        queue: RequestSender,
        shutdown: CancellationToken,
        remove_processed: bool,
    ) -> Self {
        Self {
            events,
            queue,
            shutdown,
            remove_processed,
            stabilizer: WriteStabilizer::new(),
        }
    }

    /// Run until shutdown, until the watcher goes away, or until the
    /// consumer closes the queue. Dropping `self` closes the queue.
    pub(crate) async fn run(mut self) {
        loop {
            let event = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                event = self.events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };
            if self.handle(event).await == Flow::Stop {
                break;
            }
        }
        debug!(tracked = self.stabilizer.tracked(), "ipc worker stopped");
    }

    async fn handle(&mut self, event: RawEvent) -> Flow {
        match event.kind {
            RawEventKind::Removed => {
                self.stabilizer.forget(&event.path);
                Flow::Continue
            }
            RawEventKind::Created => {
                let stamp = file_stamp(&event.path).await;
                self.stabilizer.created(&event.path, stamp);
                self.process(&event.path).await
            }
            RawEventKind::Written => self.process(&event.path).await,
        }
    }

    async fn process(&mut self, path: &Path) -> Flow {
        if !self.stabilizer.wants_read(path) {
            return Flow::Continue;
        }
        let content = tokio::fs::read(path).await;
        let Some(value) = self.stabilizer.observe(path, content) else {
            return Flow::Continue;
        };

        let parsed = parse_envelope(path, value);
        // the file is gone before the request becomes visible
        if self.remove_processed {
            remove_request_file(path).await;
        } else if let Some(stamp) = file_stamp(path).await {
            self.stabilizer.stamp_delivered(path, stamp);
        }

        match parsed {
            Ok(request) => {
                info!(id = %request.id(), action = %request.action(), "request received");
                match self.queue.push(request) {
                    Ok(()) => Flow::Continue,
                    Err(request) => {
                        debug!(id = %request.id(), "request queue closed, stopping worker");
                        Flow::Stop
                    }
                }
            }
            Err(error) => {
                warn!(?path, %error, "dropping malformed request");
                Flow::Continue
            }
        }
    }
}

async fn file_stamp(path: &Path) -> Option<FileStamp> {
    tokio::fs::metadata(path)
        .await
        .ok()
        .map(|meta| FileStamp::from_metadata(&meta))
}

async fn remove_request_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(?path, "removed processed request file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => warn!(?path, %error, "failed to remove processed request file"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
