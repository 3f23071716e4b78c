//! # gslink-settings
//!
//! Launcher settings as an explicit value.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`Settings::default()`], platform dependent
//! 2. **User file**: `<config dir>/groovestats-launcher/settings.json`
//!    (deep-merged over defaults)
//! 3. **Environment variables**: `GSLINK_*` overrides (highest priority)
//!
//! There is no global instance: the binary loads a [`Settings`] once and
//! passes it (or the parts it needs) to each component.
//!
//! # Usage
//!
//! ```no_run
//! let settings = gslink_settings::load_settings().unwrap_or_default();
//! println!("requests dir: {}", settings.ipc_dir().join("requests").display());
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod paths;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, save_settings,
    save_settings_to_path, settings_path,
};
pub use types::{DEBUG_GROOVESTATS_URL, DebugSettings, GROOVESTATS_URL, Settings};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = Settings::default();
        let _debug = DebugSettings::new(true);
        let _path = settings_path();
    }

    #[test]
    fn deep_merge_re_exported() {
        let a = serde_json::json!({"x": 1});
        let b = serde_json::json!({"y": 2});
        let merged = deep_merge(a, b);
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }
}
