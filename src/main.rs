use anyhow::Result;
use clap::{Parser, Subcommand};

use waypoint::cli;
use waypoint::config;
use waypoint::web;

#[derive(Debug, Parser)]
#[command(name = "waypoint")]
#[command(about = "Ambassador journey dashboard with live stats sync")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the dashboard server (frontend + stats API)
    Serve {
        /// Listen address (default from config: 127.0.0.1:9748)
        #[arg(long)]
        addr: Option<String>,
        /// Don't open the dashboard in a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Synchronize stats once and print the dashboard regions
    Sync {
        /// Ambassador id (default from config)
        #[arg(long)]
        ambassador: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Synchronize stats on a refresh interval
    Watch {
        /// Ambassador id (default from config)
        #[arg(long)]
        ambassador: Option<String>,
        /// Refresh interval in seconds (default from config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Record a tracked action: task-completed or stage-advanced
    Record {
        /// The action to record
        action: String,
        /// Ambassador id (default from config)
        #[arg(long)]
        ambassador: Option<String>,
        /// Optional detail (task name, milestone label)
        #[arg(long)]
        detail: Option<String>,
    },
    /// Show ambassador stats from the local store
    Stats {
        /// Limit to a single ambassador
        #[arg(long)]
        ambassador: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of actions
        #[arg(long)]
        days: Option<u32>,
    },
    /// Check system health: server, config, store
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write the default config to ~/.waypoint/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a config value by dotted key, e.g. sync.refresh_secs 10
    Set { key: String, value: String },
    /// Reset the config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_open } => {
            let cfg = config::load();
            let addr = addr.unwrap_or(cfg.server.addr);
            let open = cfg.server.open_browser && !no_open;
            web::serve(&addr, open)
        }
        Commands::Sync { ambassador, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_sync(ambassador.as_deref(), fmt)
        }
        Commands::Watch {
            ambassador,
            interval,
        } => cli::run_watch(ambassador.as_deref(), interval),
        Commands::Record {
            action,
            ambassador,
            detail,
        } => cli::run_record(ambassador.as_deref(), &action, detail.as_deref()),
        Commands::Stats {
            ambassador,
            format,
            days,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(ambassador.as_deref(), fmt, days)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::run_config_show(),
            ConfigCommands::Init { force } => cli::run_config_init(force),
            ConfigCommands::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigCommands::Reset => cli::run_config_reset(),
        },
    }
}
