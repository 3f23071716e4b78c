//! Consumer loop: one task per request, responses written as they finish.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use gslink_core::Request;
use gslink_ipc::{RequestQueue, ResponseWriter};

use crate::handler::RequestHandler;

/// Handle every request until the queue reports closed, then wait for the
/// requests still in flight.
pub async fn consume(
    mut queue: RequestQueue,
    responses: ResponseWriter,
    handler: Arc<dyn RequestHandler>,
) {
    let mut in_flight = JoinSet::new();
    while let Some(request) = queue.recv().await {
        let handler = Arc::clone(&handler);
        let responses = responses.clone();
        let _ = in_flight.spawn(async move { respond(handler.as_ref(), &responses, request).await });
        while let Some(done) = in_flight.try_join_next() {
            report(done);
        }
    }

    if !in_flight.is_empty() {
        info!(count = in_flight.len(), "waiting for in-flight requests");
    }
    while let Some(done) = in_flight.join_next().await {
        report(done);
    }
    debug!("request consumer stopped");
}

async fn respond(handler: &dyn RequestHandler, responses: &ResponseWriter, request: Request) {
    let id = request.id();
    let Some(payload) = handler.handle(&request).await else {
        debug!(%id, "no response for request");
        return;
    };
    match responses.write_async(id, &payload).await {
        Ok(path) => debug!(%id, ?path, "response published"),
        Err(e) => error!(%id, error = %e, "failed to write response"),
    }
}

fn report(done: Result<(), tokio::task::JoinError>) {
    if let Err(e) = done {
        error!(error = %e, "request task failed");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
