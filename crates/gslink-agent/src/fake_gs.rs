//! Offline GrooveStats responder.
//!
//! Answers the GrooveStats actions with canned payloads so the game side can
//! be exercised without network access. The switches come from
//! [`DebugSettings`].

use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::debug;

use gslink_core::{NewSessionRequest, PlayerScoresRequest, Request, SubmitScoreRequest};
use gslink_settings::DebugSettings;

/// Canned GrooveStats answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeGrooveStats {
    network_error: bool,
    delay: Duration,
    new_session_result: String,
    submit_result: String,
    rpg: bool,
}

impl FakeGrooveStats {
    pub fn new(debug: &DebugSettings) -> Self {
        Self {
            network_error: debug.fake_gs_network_error,
            delay: Duration::from_millis(debug.fake_gs_network_delay_ms),
            new_session_result: debug.fake_gs_new_session_result.clone(),
            submit_result: debug.fake_gs_submit_result.clone(),
            rpg: debug.fake_gs_rpg,
        }
    }

    /// Answer a GrooveStats request. `None` for requests it does not own.
    pub async fn respond(&self, request: &Request) -> Option<Value> {
        let data = match request {
            Request::Ping(_) => return None,
            Request::NewSession(r) => self.new_session(r),
            Request::PlayerScores(r) => self.player_scores(r),
            Request::SubmitScore(r) => self.submit_score(r),
        };

        if !self.delay.is_zero() {
            debug!(id = %request.id(), delay_ms = self.delay.as_millis(), "simulating network delay");
            tokio::time::sleep(self.delay).await;
        }
        if self.network_error {
            return Some(json!({"success": false, "data": Value::Null}));
        }
        Some(json!({"success": true, "data": data}))
    }

    fn new_session(&self, _request: &NewSessionRequest) -> Value {
        json!({
            "servicesResult": self.new_session_result,
            "servicesAllowed": {
                "playerScores": true,
                "playerLeaderboards": true,
                "scoreSubmit": true,
            },
        })
    }

    fn player_scores(&self, request: &PlayerScoresRequest) -> Value {
        let keys = [&request.api_key_player1, &request.api_key_player2];
        let mut data = Map::new();
        for (slot, key) in (1..).zip(keys) {
            if key.is_none() {
                continue;
            }
            let mut player = json!({
                "chartHash": request.chart,
                "isRanked": true,
                "gsLeaderboard": [],
            });
            if self.rpg {
                player["rpg"] = json!({"name": "Fake RPG", "rpgLeaderboard": []});
            }
            let _ = data.insert(format!("player{slot}"), player);
        }
        Value::Object(data)
    }

    fn submit_score(&self, request: &SubmitScoreRequest) -> Value {
        let mut player = json!({
            "chartHash": request.hash,
            "isRanked": true,
            "result": self.submit_result,
            "score": request.score,
            "rate": request.rate,
        });
        if self.rpg {
            player["rpg"] = json!({"name": "Fake RPG", "result": self.submit_result});
        }
        json!({"player1": player})
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
