//! Display-state model for the ambassador dashboard.
//!
//! Mirrors the DOM contract of the embedded frontend: exactly three stat
//! display regions that stats sync owns, a set of independent panels owned by
//! other dashboard modules, and the legacy browser-local store that the old
//! read path used. The synchronizer writes the three stat regions and nothing
//! else.

use std::collections::{BTreeMap, HashMap};

use crate::store::reporter::AmbassadorStats;

/// Legacy local-store keys from the old client-side design. Kept only so the
/// isolation contract ("never read or write these") is testable.
pub const LEGACY_KEYS: [&str; 3] = ["journeyProgress", "completedTasks", "heroText"];

/// Names of the independent dashboard panels stats sync must not touch.
pub const OTHER_MODULES: [&str; 3] = ["video", "reminders", "partner-calls"];

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// In-memory dashboard display state.
///
/// The three stat regions hold whatever was last rendered — on a failed sync
/// they simply keep their values (last-known-good retention). `modules` and
/// `local_store` belong to other code; the synchronizer holds no write path
/// to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    /// Journey progress indicator region (`#journey-progress`).
    pub journey_progress: String,
    /// Completed-tasks count region (`#completed-tasks`).
    pub completed_tasks: String,
    /// Hero text region (`#hero-text`).
    pub hero_text: String,
    /// Panels owned by other dashboard modules, keyed by module name.
    pub modules: BTreeMap<String, String>,
    /// The legacy browser-local persistent store the old design read stats
    /// from. Present for isolation testing only.
    pub local_store: HashMap<String, String>,
}

impl Dashboard {
    /// A dashboard with empty stat regions and placeholder panels for the
    /// independent modules.
    pub fn new() -> Self {
        let mut modules = BTreeMap::new();
        for name in OTHER_MODULES {
            modules.insert(name.to_string(), String::new());
        }
        Self {
            modules,
            ..Self::default()
        }
    }

    /// Render stats into the three designated regions, in place.
    ///
    /// This is the only write path the synchronizer uses. Nothing else on the
    /// dashboard is touched.
    pub fn apply_stats(&mut self, stats: &AmbassadorStats) {
        self.journey_progress = stats.journey_progress.to_string();
        self.completed_tasks = stats.completed_tasks_count.to_string();
        self.hero_text = stats.hero_text.clone();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dashboard_has_placeholder_module_panels() {
        let dash = Dashboard::new();
        assert_eq!(dash.modules.len(), OTHER_MODULES.len());
        assert!(dash.modules.contains_key("video"));
        assert!(dash.modules.contains_key("reminders"));
        assert!(dash.modules.contains_key("partner-calls"));
        assert!(dash.local_store.is_empty());
    }

    #[test]
    fn apply_stats_writes_exactly_three_regions() {
        let mut dash = Dashboard::new();
        dash.modules
            .insert("video".to_string(), "playing".to_string());
        dash.local_store
            .insert("journeyProgress".to_string(), "1".to_string());

        let stats = AmbassadorStats {
            journey_progress: 3,
            completed_tasks_count: 12,
            hero_text: "Halfway there!".to_string(),
        };
        dash.apply_stats(&stats);

        assert_eq!(dash.journey_progress, "3");
        assert_eq!(dash.completed_tasks, "12");
        assert_eq!(dash.hero_text, "Halfway there!");
        // Other modules and legacy storage are untouched.
        assert_eq!(dash.modules["video"], "playing");
        assert_eq!(dash.local_store["journeyProgress"], "1");
    }

    #[test]
    fn apply_stats_overwrites_previous_values() {
        let mut dash = Dashboard::new();
        dash.apply_stats(&AmbassadorStats {
            journey_progress: 1,
            completed_tasks_count: 2,
            hero_text: "First milestone down!".to_string(),
        });
        dash.apply_stats(&AmbassadorStats {
            journey_progress: 2,
            completed_tasks_count: 7,
            hero_text: "Building momentum!".to_string(),
        });

        // Last applied response wins.
        assert_eq!(dash.journey_progress, "2");
        assert_eq!(dash.completed_tasks, "7");
        assert_eq!(dash.hero_text, "Building momentum!");
    }
}
