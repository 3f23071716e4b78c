//! Envelope parsing: raw request JSON into a typed [`Request`].
//!
//! The `action` field is read as a plain string and matched once. Known
//! actions decode their remaining fields with serde; anything else is an
//! [`EnvelopeError::UnknownAction`]. Unknown extra fields are ignored.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{EnvelopeError, Result};
use crate::ids::RequestId;
use crate::request::{
    Action, NewSessionRequest, PingRequest, PlayerScoresRequest, Request, SubmitScoreRequest,
};

const ACTION_FIELD: &str = "action";

#[derive(Deserialize)]
struct PlayerScoresFields {
    chart: String,
    #[serde(rename = "api-key-player-1", default)]
    api_key_player1: Option<String>,
    #[serde(rename = "api-key-player-2", default)]
    api_key_player2: Option<String>,
}

#[derive(Deserialize)]
struct SubmitScoreFields {
    #[serde(rename = "api-key")]
    api_key: String,
    #[serde(rename = "profile-name")]
    profile_name: String,
    hash: String,
    score: u32,
    rate: u32,
}

/// Parse raw request bytes read from `path`.
pub fn parse_request(path: &Path, bytes: &[u8]) -> Result<Request> {
    let value: Value = serde_json::from_slice(bytes)?;
    parse_envelope(path, value)
}

/// Classify an already-decoded envelope read from `path`.
///
/// The request id is always the file stem of `path`.
pub fn parse_envelope(path: &Path, value: Value) -> Result<Request> {
    let id = RequestId::from_path(path)
        .ok_or_else(|| EnvelopeError::InvalidFilename(path.to_path_buf()))?;

    if !value.is_object() {
        return Err(EnvelopeError::NotAnObject);
    }
    let discriminator = value
        .get(ACTION_FIELD)
        .and_then(Value::as_str)
        .ok_or(EnvelopeError::MissingAction)?;
    let action = Action::parse(discriminator)
        .ok_or_else(|| EnvelopeError::UnknownAction(discriminator.to_owned()))?;

    let request = match action {
        Action::Ping => Request::Ping(PingRequest { id }),
        Action::NewSession => Request::NewSession(NewSessionRequest { id }),
        Action::PlayerScores => {
            let fields: PlayerScoresFields = decode_fields(action, value)?;
            Request::PlayerScores(PlayerScoresRequest {
                id,
                chart: fields.chart,
                api_key_player1: fields.api_key_player1,
                api_key_player2: fields.api_key_player2,
            })
        }
        Action::SubmitScore => {
            let fields: SubmitScoreFields = decode_fields(action, value)?;
            Request::SubmitScore(SubmitScoreRequest {
                id,
                api_key: fields.api_key,
                profile_name: fields.profile_name,
                hash: fields.hash,
                score: fields.score,
                rate: fields.rate,
            })
        }
    };
    Ok(request)
}

fn decode_fields<T: DeserializeOwned>(action: Action, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| EnvelopeError::InvalidFields {
        action: action.as_str(),
        source,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn path(id: &str) -> std::path::PathBuf {
        Path::new("/save/requests").join(format!("{id}.json"))
    }

    // ── dispatch ────────────────────────────────────────────────────

    #[test]
    fn ping() {
        let request = parse_request(
            &path("bda6a8a9d7924c149697e13b93aa68bf"),
            br#"{ "action": "ping" }"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::Ping(PingRequest {
                id: RequestId::from("bda6a8a9d7924c149697e13b93aa68bf"),
            })
        );
    }

    #[test]
    fn new_session() {
        let request = parse_envelope(
            &path("b787ae38ea0c465e8d853015db940915"),
            json!({"action": "groovestats/new-session"}),
        )
        .unwrap();
        assert_eq!(
            request,
            Request::NewSession(NewSessionRequest {
                id: RequestId::from("b787ae38ea0c465e8d853015db940915"),
            })
        );
    }

    #[test]
    fn player_scores_absent_key_is_none() {
        let request = parse_envelope(
            &path("8eef8847d10041e2b519ac28165e9a24"),
            json!({
                "action": "groovestats/player-scores",
                "chart": "H",
                "api-key-player-2": "K"
            }),
        )
        .unwrap();
        assert_eq!(
            request,
            Request::PlayerScores(PlayerScoresRequest {
                id: RequestId::from("8eef8847d10041e2b519ac28165e9a24"),
                chart: "H".into(),
                api_key_player1: None,
                api_key_player2: Some("K".into()),
            })
        );
    }

    #[test]
    fn player_scores_empty_key_stays_empty_string() {
        let request = parse_envelope(
            &path("x"),
            json!({
                "action": "groovestats/player-scores",
                "chart": "H",
                "api-key-player-1": ""
            }),
        )
        .unwrap();
        assert_matches!(request, Request::PlayerScores(r) => {
            assert_eq!(r.api_key_player1.as_deref(), Some(""));
            assert_eq!(r.api_key_player2, None);
        });
    }

    #[test]
    fn player_scores_null_key_is_none() {
        let request = parse_envelope(
            &path("x"),
            json!({
                "action": "groovestats/player-scores",
                "chart": "H",
                "api-key-player-1": null
            }),
        )
        .unwrap();
        assert_matches!(request, Request::PlayerScores(r) if r.api_key_player1.is_none());
    }

    #[test]
    fn submit_score() {
        let request = parse_envelope(
            &path("25a1506cdeff4d01b50f8207313f5db1"),
            json!({
                "action": "groovestats/submit-score",
                "api-key": "K",
                "profile-name": "N",
                "hash": "H",
                "score": 10000,
                "rate": 100
            }),
        )
        .unwrap();
        assert_eq!(
            request,
            Request::SubmitScore(SubmitScoreRequest {
                id: RequestId::from("25a1506cdeff4d01b50f8207313f5db1"),
                api_key: "K".into(),
                profile_name: "N".into(),
                hash: "H".into(),
                score: 10000,
                rate: 100,
            })
        );
    }

    #[test]
    fn id_comes_from_filename_not_body() {
        let request = parse_envelope(&path("fromfile"), json!({"action": "ping", "id": "frombody"}))
            .unwrap();
        assert_eq!(request.id().as_str(), "fromfile");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let request = parse_envelope(
            &path("x"),
            json!({"action": "groovestats/new-session", "chartHashVersion": 3}),
        )
        .unwrap();
        assert_eq!(request.action(), Action::NewSession);
    }

    // ── failures ────────────────────────────────────────────────────

    #[test]
    fn truncated_json_is_json_error() {
        let err = parse_request(&path("x"), br#"{"action": "#).unwrap_err();
        assert_matches!(err, EnvelopeError::Json(_));
    }

    #[test]
    fn unknown_action() {
        let err = parse_envelope(&path("x"), json!({"action": "groovestats/rpg"})).unwrap_err();
        assert_matches!(err, EnvelopeError::UnknownAction(a) if a == "groovestats/rpg");
    }

    #[test]
    fn missing_action() {
        let err = parse_envelope(&path("x"), json!({"chart": "H"})).unwrap_err();
        assert_matches!(err, EnvelopeError::MissingAction);
    }

    #[test]
    fn non_string_action() {
        let err = parse_envelope(&path("x"), json!({"action": 1})).unwrap_err();
        assert_matches!(err, EnvelopeError::MissingAction);
    }

    #[test]
    fn not_an_object() {
        let err = parse_envelope(&path("x"), json!(["ping"])).unwrap_err();
        assert_matches!(err, EnvelopeError::NotAnObject);
    }

    #[test]
    fn missing_required_field() {
        let err =
            parse_envelope(&path("x"), json!({"action": "groovestats/player-scores"})).unwrap_err();
        assert_matches!(
            err,
            EnvelopeError::InvalidFields { action: "groovestats/player-scores", .. }
        );
    }

    #[test]
    fn negative_score_is_rejected() {
        let err = parse_envelope(
            &path("x"),
            json!({
                "action": "groovestats/submit-score",
                "api-key": "K", "profile-name": "N", "hash": "H",
                "score": -1, "rate": 100
            }),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::InvalidFields { .. });
    }

    #[test]
    fn fractional_and_string_numbers_are_rejected() {
        for (score, rate) in [(json!(99.5), json!(100)), (json!(10000), json!("100"))] {
            let err = parse_envelope(
                &path("x"),
                json!({
                    "action": "groovestats/submit-score",
                    "api-key": "K", "profile-name": "N", "hash": "H",
                    "score": score, "rate": rate
                }),
            )
            .unwrap_err();
            assert_matches!(err, EnvelopeError::InvalidFields { .. });
        }
    }

    #[test]
    fn overflowing_score_is_rejected() {
        let err = parse_envelope(
            &path("x"),
            json!({
                "action": "groovestats/submit-score",
                "api-key": "K", "profile-name": "N", "hash": "H",
                "score": 4_294_967_296_u64, "rate": 100
            }),
        )
        .unwrap_err();
        assert_matches!(err, EnvelopeError::InvalidFields { .. });
    }

    #[test]
    fn filename_without_stem() {
        let err = parse_envelope(Path::new("/"), json!({"action": "ping"})).unwrap_err();
        assert_matches!(err, EnvelopeError::InvalidFilename(_));
    }
}
