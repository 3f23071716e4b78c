//! Typed request variants.
//!
//! A request file is classified exactly once, at parse time, into one of the
//! variants of [`Request`]. Every variant carries the [`RequestId`] taken
//! from the file name; envelope content never supplies the id.

use std::fmt;

use serde::Serialize;

use crate::ids::RequestId;

// ─────────────────────────────────────────────────────────────────────────────
// Action discriminator
// ─────────────────────────────────────────────────────────────────────────────

/// Wire value of the `action` field, one per [`Request`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// `ping`
    Ping,
    /// `groovestats/new-session`
    NewSession,
    /// `groovestats/player-scores`
    PlayerScores,
    /// `groovestats/submit-score`
    SubmitScore,
}

impl Action {
    /// Every known action, in wire-table order.
    pub const ALL: [Self; 4] = [
        Self::Ping,
        Self::NewSession,
        Self::PlayerScores,
        Self::SubmitScore,
    ];

    /// The exact discriminator string used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::NewSession => "groovestats/new-session",
            Self::PlayerScores => "groovestats/player-scores",
            Self::SubmitScore => "groovestats/submit-score",
        }
    }

    /// Look up an action by its wire string. Matching is exact.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ping" => Some(Self::Ping),
            "groovestats/new-session" => Some(Self::NewSession),
            "groovestats/player-scores" => Some(Self::PlayerScores),
            "groovestats/submit-score" => Some(Self::SubmitScore),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variants
// ─────────────────────────────────────────────────────────────────────────────

/// Liveness probe from the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PingRequest {
    /// Correlation id.
    pub id: RequestId,
}

/// Request to open a GrooveStats session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewSessionRequest {
    /// Correlation id.
    pub id: RequestId,
}

/// Leaderboard lookup for a chart, for up to two players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerScoresRequest {
    /// Correlation id.
    pub id: RequestId,
    /// Chart hash.
    pub chart: String,
    /// API key of player 1, when that side is joined.
    pub api_key_player1: Option<String>,
    /// API key of player 2, when that side is joined.
    pub api_key_player2: Option<String>,
}

/// Score submission for one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmitScoreRequest {
    /// Correlation id.
    pub id: RequestId,
    /// Player API key.
    pub api_key: String,
    /// Local profile name.
    pub profile_name: String,
    /// Chart hash.
    pub hash: String,
    /// Score in hundredths of a percent (10000 = 100.00%).
    pub score: u32,
    /// Music rate in percent (100 = 1.0x).
    pub rate: u32,
}

/// A fully parsed request, ready for application code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Request {
    /// `ping`
    Ping(PingRequest),
    /// `groovestats/new-session`
    NewSession(NewSessionRequest),
    /// `groovestats/player-scores`
    PlayerScores(PlayerScoresRequest),
    /// `groovestats/submit-score`
    SubmitScore(SubmitScoreRequest),
}

impl Request {
    /// Correlation id of this request.
    #[must_use]
    pub fn id(&self) -> &RequestId {
        match self {
            Self::Ping(r) => &r.id,
            Self::NewSession(r) => &r.id,
            Self::PlayerScores(r) => &r.id,
            Self::SubmitScore(r) => &r.id,
        }
    }

    /// Discriminator this request was parsed from.
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::Ping(_) => Action::Ping,
            Self::NewSession(_) => Action::NewSession,
            Self::PlayerScores(_) => Action::PlayerScores,
            Self::SubmitScore(_) => Action::SubmitScore,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_strings_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn action_parse_is_exact() {
        assert_eq!(Action::parse("PING"), None);
        assert_eq!(Action::parse(" ping"), None);
        assert_eq!(Action::parse("groovestats/new_session"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::SubmitScore.to_string(), "groovestats/submit-score");
    }

    #[test]
    fn request_id_and_action() {
        let request = Request::PlayerScores(PlayerScoresRequest {
            id: RequestId::from("abc"),
            chart: "H".into(),
            api_key_player1: None,
            api_key_player2: Some("K".into()),
        });
        assert_eq!(request.id().as_str(), "abc");
        assert_eq!(request.action(), Action::PlayerScores);
    }

    #[test]
    fn ping_request_action() {
        let request = Request::Ping(PingRequest {
            id: RequestId::from("p"),
        });
        assert_eq!(request.action(), Action::Ping);
        assert_eq!(request.id().as_str(), "p");
    }
}
