//! End-to-end tests for `GET /status` through the full router and middleware.
//!
//! Run with: cargo test --test status_endpoint
use std::io;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use tower::ServiceExt;

use devops_demo_api::{
    create_router, AppConfig, AppState, CliOverrides, HostProbe, StatusRecord, StatusReporter,
};

struct FixedHost;

impl HostProbe for FixedHost {
    fn host_name(&self) -> io::Result<String> {
        Ok("ci-runner-7".to_string())
    }
}

struct BrokenHost;

impl HostProbe for BrokenHost {
    fn host_name(&self) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::Other, "uname failed"))
    }
}

fn app_with(config: AppConfig, probe: Arc<dyn HostProbe>) -> Router {
    let reporter = StatusReporter::with_probe(Arc::new(config), probe).with_release_version(None);
    create_router(AppState::with_reporter(reporter))
}

fn config_from_env(env: Vec<(&str, &str)>) -> AppConfig {
    AppConfig::from_sources(None, env, &CliOverrides::default()).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn status_returns_ok_with_exactly_the_documented_fields() {
    let app = app_with(AppConfig::default(), Arc::new(FixedHost));

    let response = get(&app, "/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let json = body_json(response).await;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 8);
    for field in [
        "ApplicationName",
        "Version",
        "Environment",
        "HostName",
        "ServerTime",
        "ProcessId",
        "Framework",
        "ConfigurationMarker",
    ] {
        assert!(
            object.get(field).is_some_and(|v| !v.is_null()),
            "missing or null field {field}"
        );
    }
    assert_eq!(object["ApplicationName"], "DevOpsDemoApi");
    assert_eq!(object["HostName"], "ci-runner-7");
    assert_eq!(object["ProcessId"], std::process::id());
}

#[tokio::test]
async fn status_reports_configured_marker_and_environment() {
    let config = config_from_env(vec![
        ("APP_ENVIRONMENT", "Staging"),
        ("DEPLOYMENT__MARKER", "build-742"),
    ]);
    let app = app_with(config, Arc::new(FixedHost));

    let before = Utc::now();
    let response = get(&app, "/status").await;
    let after = Utc::now();
    assert_eq!(response.status(), StatusCode::OK);

    let record: StatusRecord = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(record.application_name, "DevOpsDemoApi");
    assert_eq!(record.environment, "Staging");
    assert_eq!(record.configuration_marker, "build-742");

    let server_time = DateTime::parse_from_rfc3339(&record.server_time)
        .unwrap()
        .with_timezone(&Utc);
    // ServerTime is truncated to 100ns ticks
    assert!(server_time >= before - chrono::Duration::microseconds(1));
    assert!(server_time <= after);
}

#[tokio::test]
async fn status_falls_back_when_metadata_is_missing() {
    let app = app_with(config_from_env(vec![]), Arc::new(FixedHost));

    let record: StatusRecord = serde_json::from_value(body_json(get(&app, "/status").await).await)
        .unwrap();
    assert_eq!(record.version, "1.0.0-dev");
    assert_eq!(record.configuration_marker, "Marker_Not_Set");
}

#[tokio::test]
async fn status_prefers_configured_version() {
    let config = config_from_env(vec![("DEPLOYMENT__VERSION", "2.4.0")]);
    let app = app_with(config, Arc::new(FixedHost));

    let record: StatusRecord = serde_json::from_value(body_json(get(&app, "/status").await).await)
        .unwrap();
    assert_eq!(record.version, "2.4.0");
}

#[tokio::test]
async fn repeated_calls_differ_only_in_server_time() {
    let app = app_with(config_from_env(vec![("APP_ENVIRONMENT", "QA")]), Arc::new(FixedHost));

    let first: StatusRecord = serde_json::from_value(body_json(get(&app, "/status").await).await)
        .unwrap();
    let second: StatusRecord = serde_json::from_value(body_json(get(&app, "/status").await).await)
        .unwrap();

    let first_time = DateTime::parse_from_rfc3339(&first.server_time).unwrap();
    let second_time = DateTime::parse_from_rfc3339(&second.server_time).unwrap();
    assert!(second_time >= first_time);

    let normalize = |record: StatusRecord| StatusRecord {
        server_time: String::new(),
        ..record
    };
    assert_eq!(normalize(first), normalize(second));
}

#[tokio::test]
async fn status_is_not_cacheable_and_carries_request_id() {
    let app = app_with(AppConfig::default(), Arc::new(FixedHost));

    let first = get(&app, "/status").await;
    let second = get(&app, "/status").await;

    assert_eq!(first.headers()[header::CACHE_CONTROL], "no-store");
    let first_id = first.headers()["x-request-id"].to_str().unwrap().to_string();
    let second_id = second.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&first_id).is_ok());
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn host_name_failure_is_internal_server_error() {
    let app = app_with(AppConfig::default(), Arc::new(BrokenHost));

    let response = get(&app, "/status").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn other_paths_are_not_found() {
    let app = app_with(AppConfig::default(), Arc::new(FixedHost));

    assert_eq!(get(&app, "/health").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_rejects_other_methods() {
    let app = app_with(AppConfig::default(), Arc::new(FixedHost));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
