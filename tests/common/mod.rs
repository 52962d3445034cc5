#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use classbook::config::BackendConfig;
use classbook::Store;
use serde_json::{json, Value};
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

pub const ANON_KEY: &str = "test-anon-key";

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

/// Mock backend plus a store pointed at it
pub async fn setup() -> (MockServer, Store) {
    init_test_logging();

    let server = MockServer::start().await;
    let config = BackendConfig {
        url: server.uri(),
        anon_key: ANON_KEY.to_string(),
        timeout_seconds: 5,
    };
    let store = Store::connect(&config).expect("store should build");

    (server, store)
}

pub fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// A `sessions` row with a nested enrollment roster
pub fn session_row(id: &str, start: DateTime<Utc>, user_ids: &[&str]) -> Value {
    let enrollments: Vec<Value> = user_ids.iter().map(|u| json!({ "user_id": u })).collect();
    json!({
        "id": id,
        "class_type_id": "c1",
        "instructor_id": "i1",
        "start_time": rfc3339(start),
        "end_time": rfc3339(start + Duration::minutes(45)),
        "capacity": 6,
        "enrollments": enrollments
    })
}

pub fn profile_row(id: &str, credits: i64) -> Value {
    json!({
        "id": id,
        "email": format!("{}@example.com", id),
        "name": "Test Swimmer",
        "role": "client",
        "avatar_url": null,
        "package_credits": credits
    })
}

pub fn enrollment_row(id: &str, session_id: &str, user_id: &str) -> Value {
    json!({ "id": id, "session_id": session_id, "user_id": user_id })
}
