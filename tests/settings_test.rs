mod common;

use classbook::models::Settings;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::setup;

#[tokio::test]
async fn test_no_rows_gives_documented_defaults() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .and(query_param("select", "key,value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let settings = store.settings.get_settings().await.unwrap();

    assert_eq!(settings.pool_capacity, 25);
    assert_eq!(settings.cancellation_window_hours, 24);
    assert!(!settings.maintenance_mode);
    assert_eq!(settings.contact_email, "info@classbook.app");
    assert!(!settings.contact_email.contains('"'));
}

#[tokio::test]
async fn test_stored_values_are_assembled() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "key": "pool_capacity", "value": "18" },
            { "key": "cancellation_window_hours", "value": 48 },
            { "key": "maintenance_mode", "value": true },
            { "key": "contact_email", "value": "\"hello@pool.example\"" },
        ])))
        .mount(&server)
        .await;

    let settings = store.settings.get_settings().await.unwrap();

    assert_eq!(
        settings,
        Settings {
            pool_capacity: 18,
            cancellation_window_hours: 48,
            maintenance_mode: true,
            contact_email: "hello@pool.example".to_string(),
        }
    );
}

#[tokio::test]
async fn test_save_writes_each_setting() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/settings"))
        .and(query_param("on_conflict", "key"))
        .respond_with(|request: &wiremock::Request| {
            let row: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(201).set_body_json(json!([row]))
        })
        .expect(4)
        .mount(&server)
        .await;

    let settings = Settings {
        pool_capacity: 30,
        maintenance_mode: true,
        ..Settings::default()
    };
    store.settings.save_settings(&settings).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let rows: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();

    assert_eq!(
        rows,
        vec![
            json!({ "key": "pool_capacity", "value": "30" }),
            json!({ "key": "cancellation_window_hours", "value": "24" }),
            json!({ "key": "maintenance_mode", "value": "true" }),
            json!({ "key": "contact_email", "value": "info@classbook.app" }),
        ]
    );
}
