//! Settings loading and saving.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply `GSLINK_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::paths;
use crate::types::{DebugSettings, Settings};

/// Upper bound for `GSLINK_FAKE_GS_NETWORK_DELAY_MS`.
const MAX_FAKE_DELAY_MS: u64 = 60_000;

/// Resolve the default settings file path.
pub fn settings_path() -> Result<PathBuf> {
    paths::settings_path().ok_or(SettingsError::NoConfigDir)
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<Settings> {
    load_settings_from_path(&settings_path()?)
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults with `first_launch` set. Invalid JSON is
/// an error.
pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let defaults = serde_json::to_value(Settings::default())?;

    let (merged, first_launch) = match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(?path, "loading settings from file");
            let user: Value = serde_json::from_str(&content)?;
            (deep_merge(defaults, user), false)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(?path, "settings file not found, using defaults");
            (defaults, true)
        }
        Err(e) => return Err(e.into()),
    };

    let mut settings: Settings = serde_json::from_value(merged)?;
    settings.first_launch = first_launch;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Save settings to the default path.
pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to_path(settings, &settings_path()?)
}

/// Save the persisted part of `settings` to `path`, creating the parent
/// directory if needed.
pub fn save_settings_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec(settings)?;
    std::fs::write(path, data)?;
    debug!(?path, "settings saved");
    Ok(())
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `GSLINK_*` environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// `GSLINK_DEBUG` is applied first and resets the debug switches to their
/// debug-mode defaults, so the individual switches below can still refine
/// them. Invalid values are ignored with a warning.
pub fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let read_string = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let read_bool = |name: &str| {
        let val = lookup(name)?;
        let result = parse_bool(&val);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid boolean env var, ignoring");
        }
        result
    };

    // ── Paths ───────────────────────────────────────────────────────
    if let Some(v) = read_string("GSLINK_SM_EXE_PATH") {
        settings.sm_exe_path = PathBuf::from(v);
    }
    if let Some(v) = read_string("GSLINK_SM_DATA_DIR") {
        settings.sm_data_dir = PathBuf::from(v);
    }

    // ── Debug switches ──────────────────────────────────────────────
    if let Some(v) = read_bool("GSLINK_DEBUG") {
        settings.debug = DebugSettings::new(v);
    }
    let debug = &mut settings.debug;
    if let Some(v) = read_bool("GSLINK_FAKE_GS") {
        debug.fake_gs = v;
    }
    if let Some(v) = read_bool("GSLINK_FAKE_GS_NETWORK_ERROR") {
        debug.fake_gs_network_error = v;
    }
    if let Some(val) = lookup("GSLINK_FAKE_GS_NETWORK_DELAY_MS") {
        match parse_u64_range(&val, 0, MAX_FAKE_DELAY_MS) {
            Some(v) => debug.fake_gs_network_delay_ms = v,
            None => warn!(
                key = "GSLINK_FAKE_GS_NETWORK_DELAY_MS",
                value = %val,
                "invalid delay env var, ignoring"
            ),
        }
    }
    if let Some(v) = read_string("GSLINK_FAKE_GS_NEW_SESSION_RESULT") {
        debug.fake_gs_new_session_result = v;
    }
    if let Some(v) = read_string("GSLINK_FAKE_GS_SUBMIT_RESULT") {
        debug.fake_gs_submit_result = v;
    }
    if let Some(v) = read_bool("GSLINK_FAKE_GS_RPG") {
        debug.fake_gs_rpg = v;
    }
    if let Some(v) = read_string("GSLINK_GROOVESTATS_URL") {
        debug.groovestats_url = v;
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
