//! Request handling.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use gslink_core::Request;
use gslink_settings::DebugSettings;

use crate::fake_gs::FakeGrooveStats;

/// Produces the response payload for a request.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Payload to publish for `request`, or `None` to leave it unanswered.
    async fn handle(&self, request: &Request) -> Option<Value>;
}

/// The launcher's own handler.
///
/// `ping` is answered locally. GrooveStats actions go to the offline
/// responder when it is enabled; without it they stay unanswered, since
/// this binary carries no GrooveStats client.
#[derive(Debug)]
pub struct LauncherHandler {
    fake_gs: Option<FakeGrooveStats>,
}

impl LauncherHandler {
    pub fn new(debug: &DebugSettings) -> Self {
        Self {
            fake_gs: debug.fake_gs.then(|| FakeGrooveStats::new(debug)),
        }
    }
}

#[async_trait]
impl RequestHandler for LauncherHandler {
    async fn handle(&self, request: &Request) -> Option<Value> {
        if let Request::Ping(_) = request {
            return Some(json!({"version": env!("CARGO_PKG_VERSION")}));
        }
        match &self.fake_gs {
            Some(fake) => fake.respond(request).await,
            None => {
                warn!(id = %request.id(), action = %request.action(), "no GrooveStats backend configured, request left unanswered");
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gslink_core::logging::capture_logs;
    use gslink_core::{NewSessionRequest, PingRequest, RequestId};
    use tracing::Level;

    fn ping() -> Request {
        Request::Ping(PingRequest {
            id: RequestId::from("p"),
        })
    }

    fn new_session() -> Request {
        Request::NewSession(NewSessionRequest {
            id: RequestId::from("s"),
        })
    }

    #[tokio::test]
    async fn ping_reports_version() {
        let handler = LauncherHandler::new(&DebugSettings::default());
        let response = handler.handle(&ping()).await.unwrap();
        assert_eq!(response, json!({"version": env!("CARGO_PKG_VERSION")}));
    }

    #[tokio::test]
    async fn groovestats_goes_to_fake_when_enabled() {
        let handler = LauncherHandler::new(&DebugSettings::new(true));
        let response = handler.handle(&new_session()).await.unwrap();
        assert_eq!(response["data"]["servicesResult"], "OK");
    }

    #[tokio::test]
    async fn groovestats_unanswered_without_backend() {
        let (logs, _guard) = capture_logs();
        let handler = LauncherHandler::new(&DebugSettings::default());
        assert_eq!(handler.handle(&new_session()).await, None);
        assert!(logs.has_event(Level::WARN, "left unanswered"));
    }
}
