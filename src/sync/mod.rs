//! Stats Synchronizer — the live read path for dashboard metrics.
//!
//! On each invocation, fetches the current ambassador's stats from the server
//! endpoint and renders them into the three designated dashboard regions, in
//! place. On any failure the regions keep their last-known-good values and no
//! error reaches the caller — a broken stats backend must never degrade the
//! rest of the dashboard.
//!
//! This replaces the legacy design that read the same metrics from
//! browser-local persistent storage. The synchronizer holds no reference to
//! that store and no write path to the panels owned by the video, reminders,
//! or partner-call modules.

pub mod client;
pub mod dashboard;

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::config::WaypointConfig;
pub use client::{StatsClient, SyncFailure};
pub use dashboard::Dashboard;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a single sync attempt did to the dashboard.
///
/// `sync_once` never returns an error — failures are folded into
/// [`SyncOutcome::Retained`] so callers can report without having to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fresh stats were rendered into the three stat regions.
    Updated,
    /// The fetch or parse failed; the regions kept their previous values.
    Retained(SyncFailure),
    /// Synchronization is disabled (`general.enabled = false`); nothing was
    /// attempted.
    Disabled,
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Fetch-and-render routine for one ambassador's dashboard.
#[derive(Debug)]
pub struct Synchronizer {
    client: StatsClient,
    ambassador: String,
    enabled: bool,
}

impl Synchronizer {
    /// Build a synchronizer from the resolved config.
    ///
    /// `ambassador` overrides the configured default id when given.
    pub fn from_config(config: &WaypointConfig, ambassador: Option<&str>) -> Self {
        let ambassador = ambassador
            .map(str::to_string)
            .unwrap_or_else(|| config.sync.ambassador.clone());
        Self {
            client: StatsClient::from_config(&config.sync),
            ambassador,
            enabled: config.general.enabled,
        }
    }

    /// Build a synchronizer around an explicit client (used by tests).
    pub fn new(client: StatsClient, ambassador: &str) -> Self {
        Self {
            client,
            ambassador: ambassador.to_string(),
            enabled: true,
        }
    }

    /// The ambassador id this synchronizer targets.
    pub fn ambassador(&self) -> &str {
        &self.ambassador
    }

    /// Synchronize once: fetch current stats and render them into the three
    /// designated regions of `dashboard`.
    ///
    /// On failure the dashboard is left exactly as it was, the failure is
    /// logged for diagnostics, and the outcome reports what happened. This
    /// function never panics and never returns an error.
    pub fn sync_once(&self, dashboard: &mut Dashboard) -> SyncOutcome {
        if !self.enabled {
            return SyncOutcome::Disabled;
        }

        match self.client.fetch_stats(&self.ambassador) {
            Ok(stats) => {
                dashboard.apply_stats(&stats);
                SyncOutcome::Updated
            }
            Err(failure) => {
                log_sync_failure(&self.ambassador, &failure);
                SyncOutcome::Retained(failure)
            }
        }
    }

    /// Synchronize on a fixed interval, invoking `on_cycle` after each
    /// attempt. Runs for `cycles` iterations, or forever when `None`.
    ///
    /// Attempts are sequential, so the "last response received wins" display
    /// semantics hold trivially: each cycle's result (or retention) is what
    /// the dashboard shows until the next cycle lands.
    pub fn watch<F>(
        &self,
        dashboard: &mut Dashboard,
        interval: Duration,
        cycles: Option<u64>,
        mut on_cycle: F,
    ) where
        F: FnMut(&Dashboard, &SyncOutcome),
    {
        if cycles == Some(0) {
            return;
        }

        let mut remaining = cycles;
        loop {
            let outcome = self.sync_once(dashboard);
            on_cycle(dashboard, &outcome);

            if let Some(n) = remaining.as_mut() {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    break;
                }
            }
            std::thread::sleep(interval);
        }
    }
}

// ---------------------------------------------------------------------------
// Failure diagnostics
// ---------------------------------------------------------------------------

/// Append a sync failure to the diagnostics log (`~/.waypoint/sync-log.jsonl`).
///
/// Best-effort: diagnostics must never be able to break a sync cycle, so all
/// I/O errors here are swallowed.
fn log_sync_failure(ambassador: &str, failure: &SyncFailure) {
    let Some(path) = sync_log_path() else {
        return;
    };

    if let Some(parent) = path.parent() {
        let _ = create_dir_all(parent);
    }

    let entry = serde_json::json!({
        "timestamp": Utc::now().to_rfc3339(),
        "ambassador": ambassador,
        "kind": failure.kind(),
        "message": failure.to_string(),
    });

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{entry}");
    }
}

/// Return the path to the sync diagnostics log.
pub fn sync_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".waypoint").join("sync-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
