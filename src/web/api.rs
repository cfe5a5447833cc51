//! JSON API handlers for the dashboard server.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::config;
use crate::store::logger::{self, ActionKind};
use crate::store::reporter;

use super::content_type_json;

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Stats API response — the three dashboard metrics.
///
/// This is the wire contract the synchronizer depends on; field names are
/// load-bearing.
#[derive(Serialize)]
struct StatsResponse {
    journey_progress: u32,
    completed_tasks_count: u64,
    hero_text: String,
}

/// Action recording request.
#[derive(serde::Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Config API response — the full config as a JSON value + the raw TOML.
#[derive(Serialize)]
struct ConfigResponse {
    config: config::schema::WaypointConfig,
    toml_text: String,
}

/// Config update request — a list of key-value pairs.
#[derive(serde::Deserialize)]
struct ConfigUpdateRequest {
    updates: Vec<ConfigKeyValue>,
}

#[derive(serde::Deserialize)]
struct ConfigKeyValue {
    key: String,
    value: String,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    config_exists: bool,
    action_log_exists: bool,
    ambassadors: usize,
    actions_logged: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Build a JSON 400 response.
fn bad_request(message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(400))
}

/// Matches a valid ambassador id slug: lowercase alphanumerics plus `-`/`_`,
/// 1–64 characters, starting with an alphanumeric.
static AMBASSADOR_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").expect("ambassador id regex must compile")
});

/// Check whether an ambassador id is a valid slug.
pub fn is_valid_ambassador_id(id: &str) -> bool {
    AMBASSADOR_ID_RE.is_match(id)
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/ambassadors/<id>/stats` — current stats for one ambassador.
///
/// A valid id with no recorded actions yields zeroed stats: a brand-new
/// ambassador, not an error.
pub fn get_stats(id: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    if !is_valid_ambassador_id(id) {
        return Ok(bad_request("invalid ambassador id"));
    }

    let cfg = config::load();
    let stats = reporter::compute_stats(id, None, &cfg.journey);

    json_response(&StatsResponse {
        journey_progress: stats.journey_progress,
        completed_tasks_count: stats.completed_tasks_count,
        hero_text: stats.hero_text,
    })
}

/// `POST /api/ambassadors/<id>/actions` — record a tracked action.
///
/// Expects JSON body: `{ "action": "task-completed", "detail": "..." }`.
/// Returns the refreshed stats so the caller can render without a second
/// round trip.
pub fn post_action(id: &str, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    if !is_valid_ambassador_id(id) {
        return Ok(bad_request("invalid ambassador id"));
    }

    let req: ActionRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(bad_request(&format!("invalid JSON in action request: {e}"))),
    };

    let Some(kind) = ActionKind::parse(&req.action) else {
        return Ok(bad_request(&format!("unknown action: {}", req.action)));
    };

    logger::record_action(id, kind, req.detail.as_deref())
        .context("failed to record action")?;

    let cfg = config::load();
    let stats = reporter::compute_stats(id, None, &cfg.journey);

    json_response(&StatsResponse {
        journey_progress: stats.journey_progress,
        completed_tasks_count: stats.completed_tasks_count,
        hero_text: stats.hero_text,
    })
}

/// `GET /api/config` — current effective configuration.
pub fn get_config() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let toml_text = toml::to_string_pretty(&cfg).unwrap_or_default();

    let resp = ConfigResponse {
        config: cfg,
        toml_text,
    };

    json_response(&resp)
}

/// `PUT /api/config` — update configuration keys.
///
/// Expects JSON body: `{ "updates": [{ "key": "sync.refresh_secs", "value": "10" }] }`
pub fn put_config(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: ConfigUpdateRequest =
        serde_json::from_str(body).context("invalid JSON in config update request")?;

    let mut errors: Vec<String> = Vec::new();
    let mut applied: Vec<String> = Vec::new();

    for kv in &req.updates {
        match config::set_config_value(&kv.key, &kv.value) {
            Ok(()) => applied.push(format!("{} = {}", kv.key, kv.value)),
            Err(e) => errors.push(format!("{}: {}", kv.key, e)),
        }
    }

    let result = serde_json::json!({
        "applied": applied,
        "errors": errors,
        "success": errors.is_empty(),
    });

    json_response(&result)
}

/// `POST /api/config/reset` — reset config to defaults.
pub fn post_config_reset() -> Result<Response<Cursor<Vec<u8>>>> {
    config::reset_config().context("failed to reset config")?;

    let result = serde_json::json!({
        "success": true,
        "message": "Configuration reset to defaults",
    });

    json_response(&result)
}

/// `GET /api/health` — store and config health summary.
pub fn get_health() -> Result<Response<Cursor<Vec<u8>>>> {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    let action_log_exists = logger::action_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);

    let cfg = config::load();
    let entries = logger::read_all_entries();
    let roster = reporter::compute_roster(None, &cfg.journey);

    let resp = HealthResponse {
        config_exists,
        action_log_exists,
        ambassadors: roster.len(),
        actions_logged: entries.len(),
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ambassador_ids() {
        assert!(is_valid_ambassador_id("ada"));
        assert!(is_valid_ambassador_id("ada-lovelace"));
        assert!(is_valid_ambassador_id("amb_042"));
        assert!(is_valid_ambassador_id("7seas"));
    }

    #[test]
    fn invalid_ambassador_ids() {
        assert!(!is_valid_ambassador_id(""));
        assert!(!is_valid_ambassador_id("Ada"));
        assert!(!is_valid_ambassador_id("-leading-dash"));
        assert!(!is_valid_ambassador_id("has space"));
        assert!(!is_valid_ambassador_id("semi;colon"));
        assert!(!is_valid_ambassador_id(&"a".repeat(65)));
    }

    #[test]
    fn stats_response_serializes_wire_fields() {
        let resp = StatsResponse {
            journey_progress: 3,
            completed_tasks_count: 12,
            hero_text: "Halfway there!".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"journey_progress\":3"));
        assert!(json.contains("\"completed_tasks_count\":12"));
        assert!(json.contains("\"hero_text\":\"Halfway there!\""));
    }

    #[test]
    fn action_request_deserializes() {
        let json = r#"{"action": "task-completed", "detail": "intro call"}"#;
        let req: ActionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.action, "task-completed");
        assert_eq!(req.detail.as_deref(), Some("intro call"));

        let json = r#"{"action": "stage-advanced"}"#;
        let req: ActionRequest = serde_json::from_str(json).unwrap();
        assert!(req.detail.is_none());
    }

    #[test]
    fn post_action_rejects_unknown_action() {
        let resp = post_action("ada", r#"{"action": "teleported"}"#).unwrap();
        assert_eq!(resp.status_code().0, 400);
    }

    #[test]
    fn post_action_rejects_bad_json() {
        let resp = post_action("ada", "{not json").unwrap();
        assert_eq!(resp.status_code().0, 400);
    }

    #[test]
    fn config_update_request_deserializes() {
        let json = r#"{"updates": [{"key": "sync.refresh_secs", "value": "10"}]}"#;
        let req: ConfigUpdateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.updates.len(), 1);
        assert_eq!(req.updates[0].key, "sync.refresh_secs");
        assert_eq!(req.updates[0].value, "10");
    }
}
