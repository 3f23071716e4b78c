//! Request correlation ids.
//!
//! A request id is the stem of the file the game drops into `requests/`
//! (conventionally a 32-character hex string). The same id names the
//! response file, so it is the only correlation key between the two sides.
//! Ids are never generated here and never validated beyond being non-empty.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Correlation id linking a request file to its response file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Derive the id from a request file path (the file name minus its
    /// extension).
    ///
    /// Returns `None` when the path has no usable stem.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() {
            return None;
        }
        Some(Self(stem.to_owned()))
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::ops::Deref for RequestId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn from_path_strips_extension() {
        let path = PathBuf::from("/save/requests/bda6a8a9d7924c149697e13b93aa68bf.json");
        let id = RequestId::from_path(&path).unwrap();
        assert_eq!(id.as_str(), "bda6a8a9d7924c149697e13b93aa68bf");
    }

    #[test]
    fn from_path_keeps_inner_dots() {
        let id = RequestId::from_path(Path::new("a.b.json")).unwrap();
        assert_eq!(id.as_str(), "a.b");
    }

    #[test]
    fn from_path_without_extension() {
        let id = RequestId::from_path(Path::new("requests/abc")).unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn from_path_rejects_empty_stem() {
        assert!(RequestId::from_path(Path::new("/")).is_none());
        assert!(RequestId::from_path(Path::new("")).is_none());
    }

    #[test]
    fn display_and_deref() {
        let id = RequestId::from("abc123");
        assert_eq!(format!("{id}"), "abc123");
        assert_eq!(id.len(), 6);
        assert!(id.starts_with("abc"));
    }

    #[test]
    fn serde_transparent() {
        let id = RequestId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
        let back: RequestId = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn into_string() {
        let id = RequestId::from("xyz".to_string());
        let s: String = id.clone().into();
        assert_eq!(s, "xyz");
        assert_eq!(id.into_inner(), "xyz");
    }
}
