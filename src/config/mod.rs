/// Configuration system for waypoint.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::WaypointConfig::default()`]
/// 2. **User global config** — `~/.waypoint/config.toml`
/// 3. **Project local config** — `.waypoint.toml` in the current working directory
/// 4. **Environment variables** — `WAYPOINT_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the field level: only keys actually
/// present in a TOML file override, so a project file that sets one key
/// leaves every other global setting intact.
///
/// # Usage
///
/// ```rust,ignore
/// use waypoint::config;
///
/// let cfg = config::load();
/// if cfg.general.enabled {
///     // ...
/// }
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::WaypointConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved waypoint configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> WaypointConfig {
    let mut merged = default_value_tree();

    // Layer 2: user global config (~/.waypoint/config.toml)
    // Layer 3: project local config (.waypoint.toml)
    for path in [global_config_path(), project_config_path()] {
        if let Some(overlay) = load_toml_value(path) {
            merge_value(&mut merged, &overlay);
        }
    }

    let mut config: WaypointConfig = merged.try_into().unwrap_or_default();

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// The built-in defaults as a raw TOML value tree, for field-level merging.
fn default_value_tree() -> toml::Value {
    toml::Value::try_from(WaypointConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()))
}

/// Parse a TOML config file into a raw value tree (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed or doesn't fit the schema. Bad files are silently
/// ignored so a broken config never takes the dashboard down.
fn load_toml_value(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    // Reject files a later deserialize would choke on, so one bad file
    // can't poison the merged tree.
    toml::from_str::<WaypointConfig>(&content).ok()?;
    toml::from_str(&content).ok()
}

/// Merge an overlay value tree into the base tree, field by field.
///
/// Only keys actually present in the overlay override; nested tables merge
/// recursively, so `.waypoint.toml` setting one `[sync]` key leaves the rest
/// of `[sync]` (and every other section) as the previous layer set them.
/// Non-table values (including arrays) replace wholesale.
fn merge_value(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_table.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, value) => *base_slot = value.clone(),
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.waypoint/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".waypoint").join("config.toml"))
}

/// Path to the project local config: `.waypoint.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".waypoint.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `WAYPOINT_ENABLED` — master kill switch (`1`/`true`/`yes`/`on`)
/// - `WAYPOINT_SERVER_ADDR` — dashboard server listen address
/// - `WAYPOINT_BASE_URL` — stats API base URL
/// - `WAYPOINT_AMBASSADOR` — default ambassador id
/// - `WAYPOINT_TIMEOUT_MS` — sync request timeout
/// - `WAYPOINT_REFRESH_SECS` — watch refresh interval
fn apply_env_overrides(config: &mut WaypointConfig) {
    if let Ok(val) = std::env::var("WAYPOINT_ENABLED") {
        config.general.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("WAYPOINT_SERVER_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Ok(val) = std::env::var("WAYPOINT_BASE_URL")
        && !val.is_empty()
    {
        config.sync.base_url = val;
    }
    if let Ok(val) = std::env::var("WAYPOINT_AMBASSADOR")
        && !val.is_empty()
    {
        config.sync.ambassador = val;
    }
    if let Ok(val) = std::env::var("WAYPOINT_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.sync.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("WAYPOINT_REFRESH_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.sync.refresh_secs = secs;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.waypoint/config.toml`.
///
/// Creates the `~/.waypoint/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.waypoint/ directory")?;
    }

    fs::write(&path, WaypointConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `sync.base_url`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        // Parse as toml::Value for surgical update
        let mut value_table: toml::Value =
            toml::from_str(&content).context("failed to parse config as TOML value")?;

        set_toml_value(&mut value_table, key, value)?;

        let toml_str =
            toml::to_string_pretty(&value_table).context("failed to serialize config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        fs::write(&path, toml_str).context("failed to write config file")?;

        return Ok(());
    }

    // No existing file — serialize defaults, update, write
    let toml_str = toml::to_string_pretty(&WaypointConfig::default())
        .context("failed to serialize default config")?;
    let mut value_table: toml::Value =
        toml::from_str(&toml_str).context("failed to parse serialized defaults")?;

    set_toml_value(&mut value_table, key, value)?;

    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    // Determine the type of the existing value to parse correctly
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => {
            // Parse as comma-separated list
            let items: Vec<toml::Value> = raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .collect();
            toml::Value::Array(items)
        }
        _ => {
            // Default to string
            toml::Value::String(raw_value.to_string())
        }
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_defaults_when_no_files_exist() {
        // This test relies on no config files being present in the test
        // environment. If run in a dev environment with
        // ~/.waypoint/config.toml, the result will reflect that file.
        let config = load();
        assert!(config.general.enabled);
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    /// Fold layered TOML sources over the defaults the way `load` does.
    fn merge_layers(layers: &[&str]) -> WaypointConfig {
        let mut merged = default_value_tree();
        for layer in layers {
            let overlay: toml::Value = toml::from_str(layer).unwrap();
            merge_value(&mut merged, &overlay);
        }
        merged.try_into().unwrap()
    }

    #[test]
    fn partial_project_layer_keeps_global_settings() {
        // A project file setting a single key must not revert the global
        // layer's other settings to built-in defaults.
        let global = "[general]\nenabled = false\n";
        let project = "[sync]\nrefresh_secs = 10\n";

        let config = merge_layers(&[global, project]);

        assert!(!config.general.enabled);
        assert_eq!(config.sync.refresh_secs, 10);
        // Untouched fields still carry defaults.
        assert_eq!(config.sync.timeout_ms, 5_000);
        assert_eq!(config.server.addr, "127.0.0.1:9748");
    }

    #[test]
    fn later_layer_overrides_same_field() {
        let global = "[sync]\nrefresh_secs = 60\nambassador = \"ada\"\n";
        let project = "[sync]\nrefresh_secs = 10\n";

        let config = merge_layers(&[global, project]);

        assert_eq!(config.sync.refresh_secs, 10);
        // Sibling key from the earlier layer survives.
        assert_eq!(config.sync.ambassador, "ada");
    }

    #[test]
    fn merge_value_replaces_arrays_wholesale() {
        let global = "[journey]\nhero_overrides = [\"a\", \"b\"]\n";
        let project = "[journey]\nhero_overrides = [\"c\"]\n";

        let config = merge_layers(&[global, project]);

        assert_eq!(config.journey.hero_overrides, vec!["c".to_string()]);
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[sync]
base_url = "http://127.0.0.1:9748"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "sync.base_url", "http://10.0.0.2:9748").unwrap();

        let table = root.as_table().unwrap();
        let sync = table["sync"].as_table().unwrap();
        assert_eq!(sync["base_url"].as_str(), Some("http://10.0.0.2:9748"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[general]
enabled = false
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "general.enabled", "true").unwrap();

        let table = root.as_table().unwrap();
        let general = table["general"].as_table().unwrap();
        assert_eq!(general["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[sync]
timeout_ms = 5000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "sync.timeout_ms", "2500").unwrap();

        let table = root.as_table().unwrap();
        let sync = table["sync"].as_table().unwrap();
        assert_eq!(sync["timeout_ms"].as_integer(), Some(2500));
    }

    #[test]
    fn set_toml_value_updates_array() {
        let toml_str = r#"
[journey]
hero_overrides = []
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "journey.hero_overrides", "Go!, Keep going!").unwrap();

        let table = root.as_table().unwrap();
        let journey = table["journey"].as_table().unwrap();
        let overrides = journey["hero_overrides"].as_array().unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[0].as_str(), Some("Go!"));
        assert_eq!(overrides[1].as_str(), Some("Keep going!"));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[general]
enabled = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let result = show_effective_config();
        assert!(result.is_ok());
        let toml_str = result.unwrap();
        // Should be parseable back
        let _: WaypointConfig = toml::from_str(&toml_str).unwrap();
    }
}
