//! IPC error types.
//!
//! Only setup failures and response writes surface as errors. Problems with
//! individual request files are logged by the worker and never reach callers.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring the channel up.
#[derive(Debug, Error)]
pub enum IpcError {
    /// A channel directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The requests directory could not be watched.
    #[error("failed to watch {}: {source}", path.display())]
    Watch {
        /// Directory being watched.
        path: PathBuf,
        /// Underlying watcher error.
        #[source]
        source: notify::Error,
    },

    /// Files already present in the requests directory could not be listed.
    #[error("failed to list {}: {source}", path.display())]
    ListRequests {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// [`Ipc::start`](crate::Ipc::start) was called outside a tokio runtime.
    #[error("the IPC worker needs a tokio runtime")]
    NoRuntime,
}

/// Failure to publish a response.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The payload could not be encoded as JSON.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing or publishing the response file failed.
    #[error("failed to write response {}: {source}", path.display())]
    Io {
        /// Response file being published.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The id cannot name a file inside the responses directory.
    #[error("invalid response id: {0:?}")]
    InvalidId(String),

    /// The blocking write task panicked or was cancelled.
    #[error("response write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for channel setup.
pub type Result<T> = std::result::Result<T, IpcError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_display() {
        let err = IpcError::CreateDir {
            path: PathBuf::from("/save/requests"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/save/requests"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn invalid_id_display() {
        let err = ResponseError::InvalidId("../x".into());
        assert_eq!(err.to_string(), r#"invalid response id: "../x""#);
    }

    #[test]
    fn encode_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ResponseError = json_err.into();
        assert!(matches!(err, ResponseError::Encode(_)));
    }
}
