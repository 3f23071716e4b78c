//! Request queue between the IPC worker and application code.
//!
//! An unbounded tokio mpsc channel: the worker never waits on a slow
//! consumer, and requests come out in the order their files completed.
//! Closing keeps already-queued requests; once they are drained, `recv`
//! returns `None` instead of waiting.

use tokio::sync::mpsc;

use gslink_core::Request;

pub use tokio::sync::mpsc::error::TryRecvError;

/// Producer half, owned by the IPC worker.
#[derive(Debug)]
pub(crate) struct RequestSender {
    tx: mpsc::UnboundedSender<Request>,
}

impl RequestSender {
    /// Enqueue a request. Gives it back if the queue is closed.
    pub(crate) fn push(&self, request: Request) -> Result<(), Request> {
        self.tx.send(request).map_err(|e| e.0)
    }
}

/// Consumer half: the stream of parsed requests.
#[derive(Debug)]
pub struct RequestQueue {
    rx: mpsc::UnboundedReceiver<Request>,
}

impl RequestQueue {
    /// Next request, waiting until one arrives.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn recv(&mut self) -> Option<Request> {
        self.rx.recv().await
    }

    /// Next request if one is ready.
    pub fn try_recv(&mut self) -> Result<Request, TryRecvError> {
        self.rx.try_recv()
    }

    /// Blocking variant of [`recv`](Self::recv) for consumers on a plain
    /// thread. Panics if called from within an async context.
    pub fn blocking_recv(&mut self) -> Option<Request> {
        self.rx.blocking_recv()
    }

    /// Stop accepting requests. Requests already queued stay receivable.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// Whether no further requests can arrive.
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }

    /// Number of requests waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no requests are waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a connected sender/queue pair.
pub(crate) fn channel() -> (RequestSender, RequestQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RequestSender { tx }, RequestQueue { rx })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use gslink_core::{PingRequest, RequestId};

    fn ping(id: &str) -> Request {
        Request::Ping(PingRequest {
            id: RequestId::from(id),
        })
    }

    #[tokio::test]
    async fn fifo_order() {
        let (tx, mut queue) = channel();
        for id in ["a", "b", "c"] {
            tx.push(ping(id)).unwrap();
        }
        assert_eq!(queue.len(), 3);
        for id in ["a", "b", "c"] {
            assert_eq!(queue.recv().await.unwrap().id().as_str(), id);
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn dropping_sender_drains_then_closes() {
        let (tx, mut queue) = channel();
        tx.push(ping("a")).unwrap();
        drop(tx);

        assert_eq!(queue.recv().await.unwrap().id().as_str(), "a");
        assert!(queue.recv().await.is_none());
        assert!(queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn close_keeps_queued_requests() {
        let (tx, mut queue) = channel();
        tx.push(ping("a")).unwrap();
        queue.close();

        let rejected = tx.push(ping("b")).unwrap_err();
        assert_eq!(rejected.id().as_str(), "b");

        assert_eq!(queue.recv().await.unwrap().id().as_str(), "a");
        assert!(queue.recv().await.is_none());
    }

    #[test]
    fn try_recv_states() {
        let (tx, mut queue) = channel();
        assert_matches!(queue.try_recv(), Err(TryRecvError::Empty));
        tx.push(ping("a")).unwrap();
        assert_matches!(queue.try_recv(), Ok(r) if r.id().as_str() == "a");
        drop(tx);
        assert_matches!(queue.try_recv(), Err(TryRecvError::Disconnected));
        assert!(queue.is_closed());
    }

    #[test]
    fn blocking_recv_from_plain_thread() {
        let (tx, mut queue) = channel();
        let consumer = std::thread::spawn(move || {
            let mut ids = Vec::new();
            while let Some(request) = queue.blocking_recv() {
                ids.push(request.id().to_string());
            }
            ids
        });
        tx.push(ping("a")).unwrap();
        tx.push(ping("b")).unwrap();
        drop(tx);
        assert_eq!(consumer.join().unwrap(), vec!["a", "b"]);
    }
}
