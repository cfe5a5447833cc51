/// Configuration schema and defaults for the entire waypoint system.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[general]`, `[server]`, `[sync]`, and `[journey]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level waypoint configuration.
///
/// Maps directly to the `~/.waypoint/config.toml` and `.waypoint.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    pub general: GeneralConfig,
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub journey: JourneyConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

/// General waypoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master kill switch — set to `false` to disable stats synchronization.
    /// The dashboard still renders; the regions simply keep their current
    /// values.
    pub enabled: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Embedded dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `waypoint serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on startup (best-effort).
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9748".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [sync]
// ---------------------------------------------------------------------------

/// Stats synchronizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the stats API.
    pub base_url: String,
    /// Ambassador id to synchronize when none is given on the command line.
    pub ambassador: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Refresh interval for `waypoint watch`, in seconds.
    pub refresh_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9748".to_string(),
            ambassador: String::new(),
            timeout_ms: 5_000,
            refresh_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// [journey]
// ---------------------------------------------------------------------------

/// Journey display settings.
///
/// The journey itself is fixed at [`JOURNEY_STAGES`] staged milestones; this
/// section only customizes how stages are summarized as hero text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    /// Per-stage hero text overrides, indexed by stage (`0..=6`). Entries
    /// beyond the stage count are ignored; empty strings fall back to the
    /// built-in text for that stage.
    pub hero_overrides: Vec<String>,
}

/// Number of staged milestones in the ambassador journey.
pub const JOURNEY_STAGES: u32 = 6;

/// Built-in hero text for a journey stage.
///
/// Stages beyond the last milestone clamp to the completion message.
pub fn default_hero_text(stage: u32) -> &'static str {
    match stage {
        0 => "Welcome aboard!",
        1 => "First milestone down!",
        2 => "Building momentum!",
        3 => "Halfway there!",
        4 => "The finish line is in sight!",
        5 => "One milestone to go!",
        _ => "Journey complete!",
    }
}

impl JourneyConfig {
    /// Resolve the hero text for a stage, preferring a non-empty override.
    pub fn hero_text(&self, stage: u32) -> String {
        if let Some(text) = self.hero_overrides.get(stage as usize)
            && !text.is_empty()
        {
            return text.clone();
        }
        default_hero_text(stage).to_string()
    }
}

// ---------------------------------------------------------------------------
// Default TOML
// ---------------------------------------------------------------------------

impl WaypointConfig {
    /// The annotated default config written by `waypoint config init`.
    pub fn default_toml() -> &'static str {
        r#"# waypoint configuration
# Generated by `waypoint config init`. All values shown are the defaults;
# delete anything you don't want to override.

[general]
# Master kill switch for stats synchronization.
enabled = true

[server]
# Listen address for `waypoint serve`.
addr = "127.0.0.1:9748"
# Open the dashboard in the default browser on startup.
open_browser = true

[sync]
# Base URL of the stats API.
base_url = "http://127.0.0.1:9748"
# Default ambassador id (slug) when --ambassador is not given.
ambassador = ""
# Request timeout in milliseconds.
timeout_ms = 5000
# Refresh interval for `waypoint watch`, in seconds.
refresh_secs = 30

[journey]
# Per-stage hero text overrides, indexed by stage (0..=6).
# hero_overrides = ["Welcome aboard!", "", "", "Halfway there!"]
hero_overrides = []
"#
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
