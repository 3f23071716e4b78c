//! Settings type definitions.
//!
//! Persisted fields use PascalCase keys so settings files written by earlier
//! launcher releases load unchanged. Debug switches are never persisted;
//! they come from defaults and `GSLINK_*` environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::{home_dir, user_config_dir};

/// Production GrooveStats API.
pub const GROOVESTATS_URL: &str = "https://api.groovestats.com";

/// Local GrooveStats stand-in used in debug mode.
pub const DEBUG_GROOVESTATS_URL: &str = "http://localhost:9090";

/// Launcher settings.
///
/// An explicit value handed to whichever component needs it; there is no
/// process-wide instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    /// `true` when no settings file existed at load time.
    #[serde(skip)]
    pub first_launch: bool,
    /// StepMania executable.
    pub sm_exe_path: PathBuf,
    /// StepMania user data directory (holds `Save/GrooveStats`).
    pub sm_data_dir: PathBuf,
    /// Download unlocks automatically.
    pub auto_download: bool,
    /// Unpack downloaded unlocks automatically.
    pub auto_unpack: bool,
    /// Install unlocks per profile instead of globally.
    pub user_unlocks: bool,
    /// Debug switches (not persisted).
    #[serde(skip)]
    pub debug: DebugSettings,
}

impl Settings {
    /// Base directory of the request/response channel:
    /// `<SmDataDir>/Save/GrooveStats`.
    #[must_use]
    pub fn ipc_dir(&self) -> PathBuf {
        self.sm_data_dir.join("Save").join("GrooveStats")
    }
}

impl Default for Settings {
    fn default() -> Self {
        let (sm_exe_path, sm_data_dir) = default_sm_paths();
        Self {
            first_launch: true,
            sm_exe_path,
            sm_data_dir,
            auto_download: false,
            auto_unpack: false,
            user_unlocks: false,
            debug: DebugSettings::default(),
        }
    }
}

fn default_sm_paths() -> (PathBuf, PathBuf) {
    if cfg!(windows) {
        let data_dir = user_config_dir()
            .map(|dir| dir.join("StepMania 5.1"))
            .unwrap_or_default();
        (
            PathBuf::from(r"C:\Games\StepMania 5.1\Program\StepMania.exe"),
            data_dir,
        )
    } else {
        let data_dir = home_dir()
            .map(|dir| dir.join(".stepmania-5.1"))
            .unwrap_or_default();
        (PathBuf::from("/usr/local/bin/stepmania"), data_dir)
    }
}

/// Debug and offline-testing switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugSettings {
    /// Debug mode: echo logs to stderr, talk to the local API by default.
    pub debug: bool,
    /// Answer GrooveStats requests with the offline responder.
    pub fake_gs: bool,
    /// Offline responder simulates a network failure.
    pub fake_gs_network_error: bool,
    /// Offline responder delay before answering, in milliseconds.
    pub fake_gs_network_delay_ms: u64,
    /// Result reported for `groovestats/new-session`.
    pub fake_gs_new_session_result: String,
    /// Result reported for `groovestats/submit-score`.
    pub fake_gs_submit_result: String,
    /// Include RPG data in offline responses.
    pub fake_gs_rpg: bool,
    /// GrooveStats API base URL.
    pub groovestats_url: String,
}

impl DebugSettings {
    /// Defaults for a release (`debug = false`) or debug run.
    #[must_use]
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            fake_gs: debug,
            fake_gs_network_error: false,
            fake_gs_network_delay_ms: 0,
            fake_gs_new_session_result: "OK".into(),
            fake_gs_submit_result: "score-added".into(),
            fake_gs_rpg: true,
            groovestats_url: if debug {
                DEBUG_GROOVESTATS_URL.into()
            } else {
                GROOVESTATS_URL.into()
            },
        }
    }
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self::new(false)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
