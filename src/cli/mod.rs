//! CLI command implementations for waypoint.
//!
//! Provides subcommand handlers for:
//! - `waypoint sync` — one-shot stats synchronization, prints the dashboard
//! - `waypoint watch` — periodic synchronization loop
//! - `waypoint record <action>` — append a tracked ambassador action
//! - `waypoint stats` — per-ambassador roster from the local store
//! - `waypoint health` — check server, config, and store
//! - `waypoint config show|init|set|reset` — configuration management

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::config;
use crate::store::logger::{self, ActionKind};
use crate::store::reporter::{self, RosterEntry};
use crate::sync::{Dashboard, StatsClient, SyncOutcome, Synchronizer};
use crate::web::api::is_valid_ambassador_id;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// waypoint sync
// ---------------------------------------------------------------------------

/// Synchronize once and print the resulting dashboard regions.
pub fn run_sync(ambassador: Option<&str>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let sync = Synchronizer::from_config(&cfg, ambassador);

    if sync.ambassador().is_empty() {
        anyhow::bail!("no ambassador id: pass --ambassador or set sync.ambassador in config");
    }

    let mut dashboard = Dashboard::new();
    let outcome = sync.sync_once(&mut dashboard);

    match format {
        OutputFormat::Json => print_sync_json(sync.ambassador(), &dashboard, &outcome)?,
        _ => print_sync_table(sync.ambassador(), &dashboard, &outcome),
    }

    Ok(())
}

fn print_sync_table(ambassador: &str, dashboard: &Dashboard, outcome: &SyncOutcome) {
    println!(
        "{}",
        format!("Dashboard — {ambassador}").bold().cyan()
    );
    println!("{}", "=".repeat(50));

    match outcome {
        SyncOutcome::Updated => {}
        SyncOutcome::Retained(failure) => {
            println!(
                "{}",
                format!("sync failed ({failure}); showing last-known values").yellow()
            );
        }
        SyncOutcome::Disabled => {
            println!("{}", "sync disabled in config; nothing fetched".yellow());
        }
    }

    let show = |v: &str| if v.is_empty() { "–".to_string() } else { v.to_string() };
    println!("  {} {}", "Hero:           ".bold(), show(&dashboard.hero_text));
    println!(
        "  {} {}",
        "Journey stage:  ".bold(),
        show(&dashboard.journey_progress)
    );
    println!(
        "  {} {}",
        "Completed tasks:".bold(),
        show(&dashboard.completed_tasks)
    );
}

fn print_sync_json(ambassador: &str, dashboard: &Dashboard, outcome: &SyncOutcome) -> Result<()> {
    let outcome_str = match outcome {
        SyncOutcome::Updated => "updated".to_string(),
        SyncOutcome::Retained(failure) => format!("retained: {failure}"),
        SyncOutcome::Disabled => "disabled".to_string(),
    };
    let value = serde_json::json!({
        "ambassador": ambassador,
        "outcome": outcome_str,
        "journey_progress": dashboard.journey_progress,
        "completed_tasks": dashboard.completed_tasks,
        "hero_text": dashboard.hero_text,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// waypoint watch
// ---------------------------------------------------------------------------

/// Synchronize on a refresh interval until interrupted.
pub fn run_watch(ambassador: Option<&str>, interval_secs: Option<u64>) -> Result<()> {
    let cfg = config::load();
    let sync = Synchronizer::from_config(&cfg, ambassador);

    if sync.ambassador().is_empty() {
        anyhow::bail!("no ambassador id: pass --ambassador or set sync.ambassador in config");
    }

    let interval = Duration::from_secs(interval_secs.unwrap_or(cfg.sync.refresh_secs).max(1));
    println!(
        "Watching stats for {} every {}s. Press Ctrl+C to stop.\n",
        sync.ambassador().bold(),
        interval.as_secs()
    );

    let mut dashboard = Dashboard::new();
    sync.watch(&mut dashboard, interval, None, |dash, outcome| {
        let ts = chrono::Local::now().format("%H:%M:%S");
        match outcome {
            SyncOutcome::Updated => println!(
                "{ts}  stage {}  tasks {}  {}",
                dash.journey_progress, dash.completed_tasks, dash.hero_text
            ),
            SyncOutcome::Retained(failure) => {
                println!("{ts}  {}", format!("retained ({failure})").yellow());
            }
            SyncOutcome::Disabled => println!("{ts}  {}", "sync disabled".yellow()),
        }
    });

    Ok(())
}

// ---------------------------------------------------------------------------
// waypoint record
// ---------------------------------------------------------------------------

/// Record a tracked action for an ambassador in the local store.
pub fn run_record(ambassador: Option<&str>, action: &str, detail: Option<&str>) -> Result<()> {
    let cfg = config::load();
    let id = ambassador.unwrap_or(&cfg.sync.ambassador);

    if id.is_empty() {
        anyhow::bail!("no ambassador id: pass --ambassador or set sync.ambassador in config");
    }
    if !is_valid_ambassador_id(id) {
        anyhow::bail!("invalid ambassador id: {id}");
    }

    let Some(kind) = ActionKind::parse(action) else {
        anyhow::bail!("unknown action '{action}' (expected task-completed or stage-advanced)");
    };

    logger::record_action(id, kind, detail)?;

    let stats = reporter::compute_stats(id, None, &cfg.journey);
    println!(
        "{} {id}: stage {}, {} tasks — {}",
        "Recorded".green().bold(),
        stats.journey_progress,
        stats.completed_tasks_count,
        stats.hero_text
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// waypoint stats
// ---------------------------------------------------------------------------

/// Show per-ambassador stats from the local store.
pub fn run_stats(ambassador: Option<&str>, format: OutputFormat, days: Option<u32>) -> Result<()> {
    let cfg = config::load();

    if let Some(id) = ambassador {
        let stats = reporter::compute_stats(id, days, &cfg.journey);
        match format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "ambassador": id,
                    "journey_progress": stats.journey_progress,
                    "completed_tasks_count": stats.completed_tasks_count,
                    "hero_text": stats.hero_text,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Csv => {
                println!("ambassador,journey_progress,completed_tasks_count,hero_text");
                println!(
                    "{id},{},{},{}",
                    stats.journey_progress, stats.completed_tasks_count, stats.hero_text
                );
            }
            OutputFormat::Table => {
                println!("{}", format!("Stats — {id}").bold().cyan());
                println!("{}", "=".repeat(50));
                println!("  {} {}", "Journey stage:  ".bold(), stats.journey_progress);
                println!(
                    "  {} {}",
                    "Completed tasks:".bold(),
                    stats.completed_tasks_count
                );
                println!("  {} {}", "Hero:           ".bold(), stats.hero_text);
            }
        }
        return Ok(());
    }

    let roster = reporter::compute_roster(days, &cfg.journey);
    if roster.is_empty() {
        println!(
            "{}",
            "No data yet. Record some actions to see the roster.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_roster_json(&roster)?,
        OutputFormat::Csv => print_roster_csv(&roster),
        OutputFormat::Table => print_roster_table(&roster),
    }

    Ok(())
}

fn print_roster_table(roster: &[RosterEntry]) {
    println!("{}", "Ambassador Roster".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {:<20} {:>6} {:>7} Last action",
        "Ambassador", "Stage", "Tasks"
    );
    println!("  {}", "-".repeat(58));

    for (i, entry) in roster.iter().enumerate() {
        let line = format!(
            "  {:<20} {:>6} {:>7} {}",
            truncate(&entry.ambassador, 20),
            entry.journey_progress,
            entry.completed_tasks_count,
            entry.last_action,
        );

        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_roster_json(roster: &[RosterEntry]) -> Result<()> {
    let values: Vec<_> = roster
        .iter()
        .map(|r| {
            serde_json::json!({
                "ambassador": r.ambassador,
                "journey_progress": r.journey_progress,
                "completed_tasks_count": r.completed_tasks_count,
                "last_action": r.last_action,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_roster_csv(roster: &[RosterEntry]) {
    println!("ambassador,journey_progress,completed_tasks_count,last_action");
    for r in roster {
        println!(
            "{},{},{},{}",
            r.ambassador, r.journey_progress, r.completed_tasks_count, r.last_action
        );
    }
}

// ---------------------------------------------------------------------------
// waypoint health
// ---------------------------------------------------------------------------

/// Check system health: server reachability, config, store.
pub fn run_health() -> Result<()> {
    let cfg = config::load();

    println!("{}", "waypoint Health".bold().cyan());
    println!("{}", "=".repeat(50));

    let client = StatsClient::from_config(&cfg.sync);
    let server_badge = if client.is_reachable() {
        "OK".green().bold()
    } else {
        "DOWN".red().bold()
    };
    println!("  {} {} ({})", "Server:    ".bold(), server_badge, client.base_url());

    let config_path = config::global_config_file();
    let config_badge = match &config_path {
        Some(p) if p.exists() => "OK".green().bold(),
        _ => "MISSING".yellow().bold(),
    };
    println!("  {} {}", "Config:    ".bold(), config_badge);

    let log_badge = match logger::action_log_path() {
        Some(p) if p.exists() => "OK".green().bold(),
        _ => "EMPTY".yellow().bold(),
    };
    println!("  {} {}", "Action log:".bold(), log_badge);

    let sync_log_badge = match crate::sync::sync_log_path() {
        Some(p) if p.exists() => "HAS FAILURES".yellow().bold(),
        _ => "CLEAN".green().bold(),
    };
    println!("  {} {}", "Sync log:  ".bold(), sync_log_badge);

    println!(
        "  {} {}",
        "Enabled:   ".bold(),
        if cfg.general.enabled {
            "yes".green()
        } else {
            "no".red()
        }
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// waypoint config
// ---------------------------------------------------------------------------

/// Show the effective (fully resolved) configuration.
pub fn run_config_show() -> Result<()> {
    println!("{}", config::show_effective_config()?);
    Ok(())
}

/// Initialize the global config file.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} {}", "Wrote".green().bold(), path.display());
    Ok(())
}

/// Set a single config value.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} {key} = {value}", "Set".green().bold());
    Ok(())
}

/// Reset the global config to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!("{} {}", "Reset".green().bold(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…", &s[..max.saturating_sub(1)])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_known_values() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("table")),
            OutputFormat::Table
        );
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(
            OutputFormat::from_str_opt(Some("nonsense")),
            OutputFormat::Table
        );
    }

    #[test]
    fn truncate_short_strings_unchanged() {
        assert_eq!(truncate("ada", 20), "ada");
    }

    #[test]
    fn truncate_long_strings_adds_ellipsis() {
        let long = "a-very-long-ambassador-identifier";
        let out = truncate(long, 10);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 10);
    }

    #[test]
    fn record_rejects_unknown_action() {
        let result = run_record(Some("ada"), "teleported", None);
        assert!(result.is_err());
    }

    #[test]
    fn record_rejects_invalid_id() {
        let result = run_record(Some("NOT VALID"), "task-completed", None);
        assert!(result.is_err());
    }
}
