//! Stats aggregation — folds the action log into per-ambassador stats.
//!
//! Reads the JSONL action log and provides:
//! - **AmbassadorStats**: the three dashboard metrics for one ambassador
//! - **Roster**: per-ambassador summaries for `waypoint stats`

use std::collections::HashMap;

use crate::config::schema::{JOURNEY_STAGES, JourneyConfig};
use crate::store::logger::{self, ActionKind, ActionLogEntry};

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

/// The three dashboard metrics for a single ambassador.
///
/// Created/updated server-side whenever the ambassador completes a tracked
/// action; read (never mutated) by the stats synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbassadorStats {
    /// Current journey stage, `0..=6`.
    pub journey_progress: u32,
    /// Number of tracked tasks completed.
    pub completed_tasks_count: u64,
    /// Short status summary for the hero region.
    pub hero_text: String,
}

impl AmbassadorStats {
    /// Zeroed stats for an ambassador with no recorded actions.
    pub fn fresh(journey: &JourneyConfig) -> Self {
        Self {
            journey_progress: 0,
            completed_tasks_count: 0,
            hero_text: journey.hero_text(0),
        }
    }
}

/// Per-ambassador roster entry for `waypoint stats`.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub ambassador: String,
    pub journey_progress: u32,
    pub completed_tasks_count: u64,
    pub last_action: String,
}

// ---------------------------------------------------------------------------
// Stats computation
// ---------------------------------------------------------------------------

/// Compute the current stats for one ambassador from the action log,
/// optionally filtered to the last `days` days.
pub fn compute_stats(ambassador: &str, days: Option<u32>, journey: &JourneyConfig) -> AmbassadorStats {
    let entries = logger::read_entries_since_days(days);
    build_stats(ambassador, &entries, journey)
}

/// Fold log entries into stats for one ambassador.
///
/// `stage-advanced` actions move the journey forward one stage each, clamped
/// at the final stage. `task-completed` actions increment the task count.
/// Hero text is derived from the resulting stage.
pub fn build_stats(
    ambassador: &str,
    entries: &[ActionLogEntry],
    journey: &JourneyConfig,
) -> AmbassadorStats {
    let mut stage: u32 = 0;
    let mut tasks: u64 = 0;

    for entry in entries.iter().filter(|e| e.ambassador == ambassador) {
        match entry.action {
            ActionKind::TaskCompleted => tasks += 1,
            ActionKind::StageAdvanced => stage = (stage + 1).min(JOURNEY_STAGES),
        }
    }

    AmbassadorStats {
        journey_progress: stage,
        completed_tasks_count: tasks,
        hero_text: journey.hero_text(stage),
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Compute the roster — one summary row per ambassador seen in the log.
///
/// Returns sorted by journey progress (descending), then by task count —
/// furthest-along ambassadors first.
pub fn compute_roster(days: Option<u32>, journey: &JourneyConfig) -> Vec<RosterEntry> {
    let entries = logger::read_entries_since_days(days);
    build_roster(&entries, journey)
}

fn build_roster(entries: &[ActionLogEntry], journey: &JourneyConfig) -> Vec<RosterEntry> {
    let mut groups: HashMap<String, Vec<&ActionLogEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.ambassador.clone()).or_default().push(entry);
    }

    let mut roster: Vec<RosterEntry> = groups
        .into_iter()
        .map(|(ambassador, group)| {
            let owned: Vec<ActionLogEntry> = group.iter().map(|e| (*e).clone()).collect();
            let stats = build_stats(&ambassador, &owned, journey);

            let last_action = group
                .iter()
                .map(|e| e.timestamp.as_str())
                .max()
                .unwrap_or("")
                .to_string();

            RosterEntry {
                ambassador,
                journey_progress: stats.journey_progress,
                completed_tasks_count: stats.completed_tasks_count,
                last_action,
            }
        })
        .collect();

    roster.sort_by(|a, b| {
        b.journey_progress
            .cmp(&a.journey_progress)
            .then(b.completed_tasks_count.cmp(&a.completed_tasks_count))
            .then(a.ambassador.cmp(&b.ambassador))
    });

    roster
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
