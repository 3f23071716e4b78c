//! Per-user directory resolution.
//!
//! Follows the platform conventions: `%AppData%` / `%LocalAppData%` on
//! Windows, `~/Library/...` on macOS, XDG variables elsewhere.

use std::path::PathBuf;

const APP_DIR: &str = "groovestats-launcher";

/// The user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env_path(var)
}

/// The per-user configuration root.
pub fn user_config_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        env_path("APPDATA")
    } else if cfg!(target_os = "macos") {
        home_dir().map(|h| h.join("Library").join("Application Support"))
    } else {
        env_path("XDG_CONFIG_HOME").or_else(|| home_dir().map(|h| h.join(".config")))
    }
}

/// The per-user cache root.
pub fn user_cache_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        env_path("LOCALAPPDATA")
    } else if cfg!(target_os = "macos") {
        home_dir().map(|h| h.join("Library").join("Caches"))
    } else {
        env_path("XDG_CACHE_HOME").or_else(|| home_dir().map(|h| h.join(".cache")))
    }
}

/// Settings file: `<config dir>/groovestats-launcher/settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(APP_DIR).join("settings.json"))
}

/// Log file: `<cache dir>/groovestats-launcher/log.txt`.
pub fn log_path() -> Option<PathBuf> {
    user_cache_dir().map(|dir| dir.join(APP_DIR).join("log.txt"))
}

/// Non-empty absolute path from an environment variable.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_layout() {
        if let Some(path) = settings_path() {
            assert!(path.ends_with("groovestats-launcher/settings.json"));
            assert!(path.is_absolute());
        }
    }

    #[test]
    fn log_path_layout() {
        if let Some(path) = log_path() {
            assert!(path.ends_with("groovestats-launcher/log.txt"));
        }
    }
}
