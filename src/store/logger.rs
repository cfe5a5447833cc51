use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Action log entry (JSONL store)
// ---------------------------------------------------------------------------

/// Kinds of tracked ambassador actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// The ambassador completed a tracked task. Increments the completed
    /// tasks count.
    TaskCompleted,
    /// The ambassador advanced to the next journey stage. Clamped at the
    /// final stage during aggregation.
    StageAdvanced,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskCompleted => write!(f, "task-completed"),
            Self::StageAdvanced => write!(f, "stage-advanced"),
        }
    }
}

impl ActionKind {
    /// Parse an action kind from its kebab-case name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "task-completed" => Some(Self::TaskCompleted),
            "stage-advanced" => Some(Self::StageAdvanced),
            _ => None,
        }
    }
}

/// A single entry in the action log (`~/.waypoint/action-log.jsonl`).
///
/// Each entry records one tracked action by one ambassador. The log is
/// appended server-side whenever an ambassador completes a tracked action
/// and folded into [`crate::store::reporter::AmbassadorStats`] on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub timestamp: String,
    pub ambassador: String,
    pub action: ActionKind,
    /// Optional free-form detail (task name, milestone label).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Record a tracked action for an ambassador.
///
/// Appends to the JSONL log. Failures are propagated — unlike diagnostics
/// logging, losing a tracked action silently would corrupt the stats.
pub fn record_action(ambassador: &str, action: ActionKind, detail: Option<&str>) -> Result<()> {
    let entry = ActionLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        ambassador: ambassador.to_string(),
        action,
        detail: detail.map(str::to_string),
    };
    append_log_entry(&entry)
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all action log entries from `~/.waypoint/action-log.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries() -> Vec<ActionLogEntry> {
    let Some(path) = action_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<ActionLogEntry>(&line).ok())
        .collect()
}

/// Read log entries filtered to a time window (last N days).
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(days: Option<u32>) -> Vec<ActionLogEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &ActionLogEntry) -> Result<()> {
    let Some(path) = action_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the action log file.
pub fn action_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".waypoint").join("action-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_round_trips_kebab_case() {
        let json = serde_json::to_string(&ActionKind::TaskCompleted).unwrap();
        assert_eq!(json, "\"task-completed\"");
        let kind: ActionKind = serde_json::from_str("\"stage-advanced\"").unwrap();
        assert_eq!(kind, ActionKind::StageAdvanced);
    }

    #[test]
    fn action_kind_parse_matches_display() {
        assert_eq!(
            ActionKind::parse("task-completed"),
            Some(ActionKind::TaskCompleted)
        );
        assert_eq!(
            ActionKind::parse("stage-advanced"),
            Some(ActionKind::StageAdvanced)
        );
        assert_eq!(ActionKind::parse("unknown"), None);
        assert_eq!(ActionKind::TaskCompleted.to_string(), "task-completed");
    }

    #[test]
    fn entry_without_detail_omits_field() {
        let entry = ActionLogEntry {
            timestamp: "2025-06-01T10:00:00+00:00".to_string(),
            ambassador: "ada".to_string(),
            action: ActionKind::TaskCompleted,
            detail: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("detail"));
    }

    #[test]
    fn malformed_line_is_skipped_on_parse() {
        let parsed = serde_json::from_str::<ActionLogEntry>("{not json");
        assert!(parsed.is_err());
    }
}
