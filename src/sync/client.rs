/// HTTP client for the ambassador stats API.
///
/// Fetches `GET {base_url}/api/ambassadors/{id}/stats` with the synchronous
/// `ureq` client and validates the response into
/// [`AmbassadorStats`](crate::store::reporter::AmbassadorStats).
///
/// Failures are split into the two kinds the synchronizer cares about:
/// transport/server problems and structurally bad responses. Both are
/// terminal for a single sync attempt — the caller retains the previous
/// display state either way.
use std::time::Duration;

use serde::Deserialize;

use crate::config::schema::{JOURNEY_STAGES, SyncConfig};
use crate::store::reporter::AmbassadorStats;

// ---------------------------------------------------------------------------
// Failure taxonomy
// ---------------------------------------------------------------------------

/// Why a single stats fetch produced no usable stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncFailure {
    /// Network or server error: transport failure, timeout, non-2xx status.
    Fetch(String),
    /// The response arrived but is not valid stats: not JSON, missing fields,
    /// or out-of-range values.
    Malformed(String),
}

impl std::fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(msg) => write!(f, "fetch failure: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl SyncFailure {
    /// Short kind tag for the diagnostics log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Malformed(_) => "malformed",
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Raw response body from the stats endpoint, before range validation.
///
/// Fields are signed so that negative values arrive here (and are rejected
/// below) instead of failing deserialization with an unhelpful message.
#[derive(Debug, Deserialize)]
struct RawStats {
    journey_progress: i64,
    completed_tasks_count: i64,
    hero_text: String,
}

impl RawStats {
    /// Validate ranges and convert to domain stats.
    fn validate(self) -> Result<AmbassadorStats, SyncFailure> {
        if self.journey_progress < 0 || self.journey_progress > i64::from(JOURNEY_STAGES) {
            return Err(SyncFailure::Malformed(format!(
                "journey_progress out of range: {}",
                self.journey_progress
            )));
        }
        if self.completed_tasks_count < 0 {
            return Err(SyncFailure::Malformed(format!(
                "completed_tasks_count is negative: {}",
                self.completed_tasks_count
            )));
        }

        Ok(AmbassadorStats {
            journey_progress: self.journey_progress as u32,
            completed_tasks_count: self.completed_tasks_count as u64,
            hero_text: self.hero_text,
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous stats API client.
///
/// Created from the resolved `[sync]` config and reused across refresh
/// cycles of a single `waypoint sync` / `waypoint watch` invocation.
#[derive(Debug)]
pub struct StatsClient {
    base_url: String,
    timeout: Duration,
}

impl StatsClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    /// Build a client for an explicit base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetch the current stats for an ambassador.
    ///
    /// Never panics; every failure mode maps into [`SyncFailure`].
    pub fn fetch_stats(&self, ambassador: &str) -> Result<AmbassadorStats, SyncFailure> {
        let url = format!("{}/api/ambassadors/{}/stats", self.base_url, ambassador);
        // On Windows, "localhost" may try IPv6 (::1) first, causing delays
        // when the server only binds to IPv4. Use 127.0.0.1 directly.
        let url = url.replace("://localhost", "://127.0.0.1");

        let resp = ureq::get(&url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => {
                    SyncFailure::Fetch(format!("server returned status {code}"))
                }
                ureq::Error::Transport(t) => SyncFailure::Fetch(t.to_string()),
            })?;

        let body = resp
            .into_string()
            .map_err(|e| SyncFailure::Fetch(format!("failed to read response body: {e}")))?;

        let raw: RawStats = serde_json::from_str(&body)
            .map_err(|e| SyncFailure::Malformed(e.to_string()))?;

        raw.validate()
    }

    /// Check whether the stats server is reachable.
    ///
    /// Uses a short timeout so `waypoint health` doesn't stall when the
    /// server is down.
    pub fn is_reachable(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        let url = url.replace("://localhost", "://127.0.0.1");
        ureq::get(&url).timeout(Duration::from_secs(2)).call().is_ok()
    }

    /// The base URL this client targets, for display.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = SyncConfig::default();
        let client = StatsClient::from_config(&config);
        assert_eq!(client.base_url, "http://127.0.0.1:9748");
        assert_eq!(client.timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = StatsClient::new("http://127.0.0.1:9748/", Duration::from_secs(1));
        assert_eq!(client.base_url, "http://127.0.0.1:9748");
    }

    #[test]
    fn raw_stats_validates_good_values() {
        let raw = RawStats {
            journey_progress: 3,
            completed_tasks_count: 12,
            hero_text: "Halfway there!".to_string(),
        };
        let stats = raw.validate().unwrap();
        assert_eq!(stats.journey_progress, 3);
        assert_eq!(stats.completed_tasks_count, 12);
        assert_eq!(stats.hero_text, "Halfway there!");
    }

    #[test]
    fn raw_stats_rejects_negative_count() {
        let raw = RawStats {
            journey_progress: 2,
            completed_tasks_count: -1,
            hero_text: "oops".to_string(),
        };
        let err = raw.validate().unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn raw_stats_rejects_out_of_range_stage() {
        let raw = RawStats {
            journey_progress: 7,
            completed_tasks_count: 0,
            hero_text: "??".to_string(),
        };
        assert!(matches!(
            raw.validate(),
            Err(SyncFailure::Malformed(msg)) if msg.contains("out of range")
        ));

        let raw = RawStats {
            journey_progress: -1,
            completed_tasks_count: 0,
            hero_text: "??".to_string(),
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = serde_json::from_str::<RawStats>(r#"{"journey_progress": 3}"#)
            .map_err(|e| SyncFailure::Malformed(e.to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn failure_display_includes_kind() {
        let fetch = SyncFailure::Fetch("connection refused".to_string());
        assert!(fetch.to_string().starts_with("fetch failure"));
        let malformed = SyncFailure::Malformed("missing hero_text".to_string());
        assert!(malformed.to_string().starts_with("malformed response"));
    }
}
