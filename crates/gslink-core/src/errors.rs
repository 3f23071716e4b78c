//! Envelope classification errors.
//!
//! None of these are fatal: the IPC worker logs them and drops the file.

use std::path::PathBuf;

use thiserror::Error;

/// Why a syntactically complete request file could not become a [`Request`].
///
/// [`Request`]: crate::request::Request
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The file name has no usable stem to serve as the request id.
    #[error("request file name has no id: {}", .0.display())]
    InvalidFilename(PathBuf),

    /// The content is not valid JSON.
    #[error("request is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The content is valid JSON but not an object.
    #[error("request envelope is not a JSON object")]
    NotAnObject,

    /// The `action` field is absent or not a string.
    #[error("request envelope has no string \"action\" field")]
    MissingAction,

    /// The `action` field names no known request type.
    #[error("unrecognized action: {0}")]
    UnknownAction(String),

    /// Action-specific fields are missing or have the wrong type.
    #[error("invalid fields for {action}: {source}")]
    InvalidFields {
        /// Discriminator being decoded.
        action: &'static str,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for envelope parsing.
pub type Result<T> = std::result::Result<T, EnvelopeError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_display() {
        let err = EnvelopeError::UnknownAction("groovestats/rpg".into());
        assert_eq!(err.to_string(), "unrecognized action: groovestats/rpg");
    }

    #[test]
    fn invalid_fields_display() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = EnvelopeError::InvalidFields {
            action: "groovestats/submit-score",
            source,
        };
        assert!(err.to_string().starts_with("invalid fields for groovestats/submit-score"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: EnvelopeError = json_err.into();
        assert!(matches!(err, EnvelopeError::Json(_)));
    }

    #[test]
    fn invalid_filename_display() {
        let err = EnvelopeError::InvalidFilename(PathBuf::from("/x/"));
        assert!(err.to_string().contains("/x/"));
    }
}
