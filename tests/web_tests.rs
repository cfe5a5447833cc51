//! End-to-end dashboard server tests.
//!
//! Runs the real request dispatcher behind a `tiny_http` listener on an
//! ephemeral port and talks to it with `ureq`, the same client the
//! synchronizer uses.

use std::thread;
use std::time::Duration;

use tiny_http::{Method, Server};

/// Spawn a server that routes every request through `waypoint::web::dispatch`,
/// mirroring the `waypoint serve` loop. Returns the base URL.
fn spawn_dispatch_server() -> String {
    let server = Server::http("127.0.0.1:0").expect("failed to bind test server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("test server has no IP address");
    let base_url = format!("http://{addr}");

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let method = request.method().clone();
            let url = request.url().to_string();

            let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
                let mut buf = String::new();
                let _ = request.as_reader().read_to_string(&mut buf);
                Some(buf)
            } else {
                None
            };

            match waypoint::web::dispatch(&method, &url, body.as_deref()) {
                Ok(resp) => {
                    let _ = request.respond(resp);
                }
                Err(_) => {
                    let _ = request.respond(
                        tiny_http::Response::from_string("{\"error\":\"internal\"}")
                            .with_status_code(500),
                    );
                }
            }
        }
    });

    base_url
}

fn get(url: &str) -> Result<ureq::Response, ureq::Error> {
    ureq::get(url).timeout(Duration::from_secs(2)).call()
}

#[test]
fn root_serves_the_dashboard_page() {
    let base = spawn_dispatch_server();

    let resp = get(&base).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.content_type().starts_with("text/html"));

    let html = resp.into_string().unwrap();
    assert!(html.contains(r#"id="journey-progress""#));
    assert!(html.contains(r#"id="completed-tasks""#));
    assert!(html.contains(r#"id="hero-text""#));
}

#[test]
fn stats_endpoint_returns_the_three_fields() {
    let base = spawn_dispatch_server();

    let resp = get(&format!("{base}/api/ambassadors/ada/stats")).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.content_type().starts_with("application/json"));

    let body: serde_json::Value = resp.into_json().unwrap();
    assert!(body["journey_progress"].is_u64());
    assert!(body["completed_tasks_count"].is_u64());
    assert!(body["hero_text"].is_string());

    // Wherever the store stands, the stage is within the journey.
    let stage = body["journey_progress"].as_u64().unwrap();
    assert!(stage <= 6);
}

#[test]
fn stats_endpoint_rejects_invalid_ambassador_id() {
    let base = spawn_dispatch_server();

    let err = get(&format!("{base}/api/ambassadors/Not%20Valid/stats")).unwrap_err();
    match err {
        ureq::Error::Status(code, _) => assert_eq!(code, 400),
        other => panic!("expected a 400 status, got {other}"),
    }
}

#[test]
fn unknown_api_path_is_404() {
    let base = spawn_dispatch_server();

    let err = get(&format!("{base}/api/nope")).unwrap_err();
    match err {
        ureq::Error::Status(code, _) => assert_eq!(code, 404),
        other => panic!("expected a 404 status, got {other}"),
    }
}

#[test]
fn action_endpoint_rejects_unknown_action() {
    let base = spawn_dispatch_server();

    let result = ureq::post(&format!("{base}/api/ambassadors/ada/actions"))
        .timeout(Duration::from_secs(2))
        .send_json(serde_json::json!({ "action": "teleported" }));

    match result.unwrap_err() {
        ureq::Error::Status(code, _) => assert_eq!(code, 400),
        other => panic!("expected a 400 status, got {other}"),
    }
}

#[test]
fn health_endpoint_reports_store_state() {
    let base = spawn_dispatch_server();

    let resp = get(&format!("{base}/api/health")).unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.into_json().unwrap();
    assert!(body["config_exists"].is_boolean());
    assert!(body["action_log_exists"].is_boolean());
    assert!(body["ambassadors"].is_u64());
    assert!(body["actions_logged"].is_u64());
}
