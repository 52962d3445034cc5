mod common;

use assert_matches::assert_matches;
use classbook::models::{CreateClassType, UpdateClassType};
use classbook::DataError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::setup;

fn class_row(id: &str, name: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "duration_minutes": 30,
        "price": price,
        "difficulty": "beginner",
        "capacity": 4
    })
}

#[tokio::test]
async fn test_list_classes_duplicates_price() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/class_types"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            class_row("c1", "Adult Beginner", 28.0),
            class_row("c2", "Toddler Splash", 22.0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let classes = store.classes.list_classes().await.unwrap();

    assert_eq!(classes.len(), 2);
    assert!(classes.iter().all(|c| c.price_single == c.price_package));
    assert_eq!(classes[1].price_package, 22.0);
}

#[tokio::test]
async fn test_create_update_delete_class() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/class_types"))
        .and(body_partial_json(json!({ "name": "Stroke Clinic", "price": 40.0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([class_row("c3", "Stroke Clinic", 40.0)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/class_types"))
        .and(query_param("id", "eq.c3"))
        .and(body_json(json!({ "capacity": 10 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "c3",
            "name": "Stroke Clinic",
            "duration_minutes": 30,
            "price": 40.0,
            "capacity": 10
        }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/class_types"))
        .and(query_param("id", "eq.c3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = store
        .classes
        .create_class(&CreateClassType {
            name: "Stroke Clinic".to_string(),
            description: None,
            duration_minutes: 30,
            price_single: 40.0,
            difficulty: Some("beginner".to_string()),
            capacity: 4,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "c3");

    let update = UpdateClassType {
        capacity: Some(10),
        ..Default::default()
    };
    let updated = store.classes.update_class("c3", &update).await.unwrap();
    assert_eq!(updated.capacity, 10);

    store.classes.delete_class("c3").await.unwrap();
}

#[tokio::test]
async fn test_update_of_missing_class_is_not_found() {
    let (server, store) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/class_types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let update = UpdateClassType {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = store.classes.update_class("gone", &update).await;

    assert_matches!(result, Err(DataError::NotFound { entity: "class type", .. }));
}

#[tokio::test]
async fn test_get_class_absent_is_none() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/class_types"))
        .and(query_param("id", "eq.c404"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(store.classes.get_class("c404").await.unwrap().is_none());
}

#[tokio::test]
async fn test_progress_upsert_on_student_and_skill() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/progress"))
        .and(query_param("on_conflict", "student_id,skill_id"))
        .and(body_partial_json(json!({
            "student_id": "st1",
            "skill_id": "backstroke",
            "status": "mastered"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "pr1",
            "student_id": "st1",
            "skill_id": "backstroke",
            "status": "mastered",
            "last_updated": "2026-10-19T09:00:00+00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let progress = store
        .progress
        .upsert_progress("st1", "backstroke", "mastered")
        .await
        .unwrap();

    assert_eq!(progress.status, "mastered");
    assert!(progress.last_updated.is_some());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["last_updated"].is_string());
}

#[tokio::test]
async fn test_list_progress_for_student() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/progress"))
        .and(query_param("student_id", "eq.st1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "pr1", "student_id": "st1", "skill_id": "backstroke", "status": "mastered", "last_updated": null },
            { "id": "pr2", "student_id": "st1", "skill_id": "freestyle", "status": "learning" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = store.progress.list_progress("st1").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].skill_id, "freestyle");
    assert_eq!(rows[1].last_updated, None);
}
