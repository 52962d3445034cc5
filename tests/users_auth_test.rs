mod common;

use assert_matches::assert_matches;
use classbook::api::ApiError;
use classbook::models::{CreateUser, UpdateUser, UserRole};
use classbook::DataError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{profile_row, setup};

fn session_body(token: &str, user_id: &str) -> serde_json::Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh",
        "user": { "id": user_id, "email": "ana@example.com", "user_metadata": {} }
    })
}

#[tokio::test]
async fn test_get_user_maps_profile_and_absent_is_none() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_row("u1", 4)])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.nobody"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let user = store.users.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.package_credits, 4);
    assert_eq!(user.role, UserRole::Client);

    assert!(store.users.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_users_maps_every_profile() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u1", "email": "ana@example.com", "name": "Ana", "role": "admin", "package_credits": 0 },
            { "id": "u2", "email": "ben@example.com", "name": "Ben", "role": "instructor", "package_credits": null },
            { "id": "u3", "name": "Cy", "role": "lifeguard", "package_credits": -2 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = store.users.list_users().await.unwrap();

    let summary: Vec<(&str, UserRole, u32)> = users
        .iter()
        .map(|u| (u.id.as_str(), u.role, u.package_credits))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("u1", UserRole::Admin, 0),
            ("u2", UserRole::Instructor, 0),
            ("u3", UserRole::Client, 0),
        ]
    );
    assert_eq!(users[2].email, "");
}

#[tokio::test]
async fn test_update_user_sends_partial_fields() {
    let (server, store) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.u1"))
        .and(body_json(json!({ "name": "Ana B", "role": "instructor" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "u1",
            "email": "ana@example.com",
            "name": "Ana B",
            "role": "instructor",
            "package_credits": 3
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let update = UpdateUser {
        name: Some("Ana B".to_string()),
        role: Some(UserRole::Instructor),
        package_credits: None,
    };
    let user = store.users.update_user("u1", &update).await.unwrap();

    assert_eq!(user.name, "Ana B");
    assert_eq!(user.role, UserRole::Instructor);
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let (server, store) = setup().await;

    let result = store.users.update_user("u1", &UpdateUser::default()).await;

    assert_matches!(result, Err(DataError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_account_creation_and_deletion_require_admin() {
    let (server, store) = setup().await;

    let created = store
        .users
        .create_user(&CreateUser {
            email: "new@example.com".to_string(),
            password: "secret-pass".to_string(),
            name: "New".to_string(),
            role: UserRole::Client,
        })
        .await;
    let deleted = store.users.delete_user("u1").await;

    assert_matches!(created, Err(DataError::RequiresAdmin(_)));
    assert_matches!(deleted, Err(DataError::RequiresAdmin(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_failure_carries_backend_message() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for table profiles"
        })))
        .mount(&server)
        .await;

    let result = store.users.list_users().await;

    assert_matches!(
        result,
        Err(DataError::Api(ApiError::Unauthorized(ref msg))) if msg == "permission denied for table profiles"
    );
}

#[tokio::test]
async fn test_sign_up_passes_profile_defaults() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({
            "email": "ana@example.com",
            "data": {
                "name": "Ana",
                "role": "client",
                "avatar_url": "https://ui-avatars.com/api/?name=Ana&background=random"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("new-token", "u9")))
        .expect(1)
        .mount(&server)
        .await;

    let sign_up = store
        .auth
        .sign_up("ana@example.com", "secret-pass", "Ana")
        .await
        .unwrap();

    assert_eq!(sign_up.user.id, "u9");
    assert!(sign_up.session.is_some());
    assert_eq!(store.client().access_token().as_deref(), Some("new-token"));
}

#[tokio::test]
async fn test_sign_up_pending_confirmation_has_no_session() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u10",
            "email": "ben@example.com",
            "user_metadata": { "name": "Ben" }
        })))
        .mount(&server)
        .await;

    let sign_up = store.auth.sign_up("ben@example.com", "secret-pass", "Ben").await.unwrap();

    assert_eq!(sign_up.user.id, "u10");
    assert!(sign_up.session.is_none());
    assert!(!store.client().is_authenticated());
}

#[tokio::test]
async fn test_sign_in_then_current_profile() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "secret-pass" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("tok", "u1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u1", "email": "ana@example.com" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.u1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_row("u1", 6)])))
        .expect(1)
        .mount(&server)
        .await;

    let session = store.auth.sign_in("ana@example.com", "secret-pass").await.unwrap();
    assert_eq!(session.user.id, "u1");

    let profile = store.auth.current_profile().await.unwrap();
    assert_eq!(profile.id, "u1");
    assert_eq!(profile.package_credits, 6);
}

#[tokio::test]
async fn test_bad_credentials_fail_authentication() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let result = store.auth.sign_in("ana@example.com", "wrong").await;

    assert_matches!(
        result,
        Err(DataError::Api(ApiError::AuthenticationFailed(ref msg))) if msg == "Invalid login credentials"
    );
    assert!(!store.client().is_authenticated());
}

#[tokio::test]
async fn test_current_profile_is_none_without_session() {
    let (server, store) = setup().await;

    assert!(store.auth.current_profile().await.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_current_profile_is_none_when_token_rejected() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "JWT expired" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    store.auth.restore_session("stale-token");
    assert!(store.auth.current_profile().await.is_none());
}

#[tokio::test]
async fn test_sign_out_drops_token_even_on_failure() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    store.auth.restore_session("tok");
    let result = store.auth.sign_out().await;

    assert_matches!(result, Err(DataError::Api(ApiError::ServerError(_))));
    assert!(!store.client().is_authenticated());
}

#[tokio::test]
async fn test_refresh_session_adopts_new_token() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "saved-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("fresh-token", "u1")))
        .expect(1)
        .mount(&server)
        .await;

    store.auth.restore_session("expired-token");
    let session = store.auth.refresh_session("saved-refresh").await.unwrap();

    assert_eq!(session.access_token, "fresh-token");
    assert_eq!(session.expires_in, Some(3600));
    assert_eq!(store.client().access_token().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn test_rejected_refresh_token_fails_authentication() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    store.auth.restore_session("expired-token");
    let result = store.auth.refresh_session("used-refresh").await;

    assert_matches!(
        result,
        Err(DataError::Api(ApiError::AuthenticationFailed(ref msg))) if msg == "Invalid Refresh Token: Already Used"
    );
    assert_eq!(store.client().access_token().as_deref(), Some("expired-token"));
}
