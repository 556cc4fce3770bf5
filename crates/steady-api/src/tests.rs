//! End-to-end tests for the API router against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use steady_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, auth::TokenConfig};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let state = AppState {
    store:  Arc::new(store),
    tokens: Arc::new(TokenConfig { secret: b"test-secret".to_vec() }),
  };
  crate::router(state)
}

async fn send(
  app: &Router,
  method: &str,
  path: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(path);
  if let Some(t) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
  }
  let request = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

/// Register (or log in) and return the bearer token.
async fn login(app: &Router, email: &str) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({"email": email, "password": "hunter2"})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  body["token"].as_str().unwrap().to_owned()
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_registers_then_authenticates() {
  let app = app().await;

  let (status, body) = send(
    &app,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({"email": "a@example.com", "password": "hunter2"})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["is_new_user"], json!(true));
  assert_eq!(body["user"]["email"], json!("a@example.com"));

  let (status, body) = send(
    &app,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({"email": "a@example.com", "password": "hunter2"})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["is_new_user"], json!(false));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let app = app().await;
  login(&app, "a@example.com").await;

  let (status, body) = send(
    &app,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({"email": "a@example.com", "password": "wrong"})),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_credentials_is_bad_request() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({"email": "", "password": ""})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_body_field_is_bad_request_with_error_body() {
  let app = app().await;

  // No `password` field at all, as opposed to an empty one.
  let (status, body) = send(
    &app,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({"email": "a@example.com"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("password"));

  // Same contract on authenticated routes: no `start_date`.
  let token = login(&app, "a@example.com").await;
  let (status, body) = send(
    &app,
    "POST",
    "/api/sobriety",
    Some(&token),
    Some(json!({"relapses": []})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  // And no `name` on trigger creation.
  let (status, body) = send(
    &app,
    "POST",
    "/api/triggers",
    Some(&token),
    Some(json!({"category": "social"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
  let app = app().await;

  let (status, body) = send(&app, "GET", "/api/sobriety", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], json!("unauthorized"));

  let (status, _) =
    send(&app, "GET", "/api/journals", Some("garbage"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Sobriety ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sobriety_is_404_until_initialized() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let (status, _) =
    send(&app, "GET", "/api/sobriety", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn streak_is_derived_from_start_date() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let start = Utc::now() - Duration::days(10);
  let (status, body) = send(
    &app,
    "POST",
    "/api/sobriety",
    Some(&token),
    Some(json!({"start_date": start.to_rfc3339()})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["current_streak"], json!(10));

  let (status, body) =
    send(&app, "GET", "/api/sobriety", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["current_streak"], json!(10));
  assert_eq!(body["relapses"], json!([]));
}

#[tokio::test]
async fn relapse_resets_streak_and_snapshots_triggers() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let start = Utc::now() - Duration::days(30);
  send(
    &app,
    "POST",
    "/api/sobriety",
    Some(&token),
    Some(json!({"start_date": start.to_rfc3339()})),
  )
  .await;

  let (_, trigger) = send(
    &app,
    "POST",
    "/api/triggers",
    Some(&token),
    Some(json!({"name": "Work"})),
  )
  .await;
  let trigger_id = trigger["trigger_id"].as_str().unwrap();

  let (status, body) = send(
    &app,
    "POST",
    "/api/sobriety/relapse",
    Some(&token),
    Some(json!({"reason": "stress", "trigger_ids": [trigger_id]})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["current_streak"], json!(0));
  assert_eq!(body["relapses"].as_array().unwrap().len(), 1);
  assert_eq!(body["relapses"][0]["reason"], json!("stress"));
  assert_eq!(body["relapses"][0]["triggers"], json!(["Work"]));

  // Renaming the trigger must not rewrite history.
  send(
    &app,
    "PUT",
    &format!("/api/triggers/{trigger_id}"),
    Some(&token),
    Some(json!({"name": "Office", "category": "environmental"})),
  )
  .await;

  let (_, body) = send(&app, "GET", "/api/sobriety", Some(&token), None).await;
  assert_eq!(body["relapses"][0]["triggers"], json!(["Work"]));
}

// ─── Triggers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn trigger_crud_and_validation() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let (status, _) = send(
    &app,
    "POST",
    "/api/triggers",
    Some(&token),
    Some(json!({"name": "  "})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, created) = send(
    &app,
    "POST",
    "/api/triggers",
    Some(&token),
    Some(json!({"name": "Stress", "category": "emotional"})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["trigger_id"].as_str().unwrap().to_owned();

  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/api/triggers/{id}"),
    Some(&token),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/api/triggers/{id}"),
    Some(&token),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cross_user_trigger_access_is_404() {
  let app = app().await;
  let alice = login(&app, "alice@example.com").await;
  let bob = login(&app, "bob@example.com").await;

  let (_, created) = send(
    &app,
    "POST",
    "/api/triggers",
    Some(&alice),
    Some(json!({"name": "Work"})),
  )
  .await;
  let id = created["trigger_id"].as_str().unwrap();

  let (status, _) = send(
    &app,
    "PUT",
    &format!("/api/triggers/{id}"),
    Some(&bob),
    Some(json!({"name": "Hijack"})),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/api/triggers/{id}"),
    Some(&bob),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Journal & CBT ───────────────────────────────────────────────────────────

#[tokio::test]
async fn journal_create_list_delete() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let (status, entry) = send(
    &app,
    "POST",
    "/api/journals",
    Some(&token),
    Some(json!({"mood_rating": 7, "note": "steady day"})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = entry["entry_id"].as_str().unwrap().to_owned();

  let (status, body) =
    send(&app, "GET", "/api/journals", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["entries"].as_array().unwrap().len(), 1);
  assert_eq!(body["entries"][0]["note"], json!("steady day"));

  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/api/journals/{id}"),
    Some(&token),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn cbt_requires_kind_and_content() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let (status, _) = send(
    &app,
    "POST",
    "/api/cbt",
    Some(&token),
    Some(json!({"kind": "abc"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, created) = send(
    &app,
    "POST",
    "/api/cbt",
    Some(&token),
    Some(json!({"kind": "abc", "content": {"activating_event": "argument"}})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["content"]["activating_event"], json!("argument"));
}

// ─── Achievements ────────────────────────────────────────────────────────────

#[tokio::test]
async fn achievements_start_locked() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  let (status, body) =
    send(&app, "GET", "/api/achievements", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let badges = body.as_array().unwrap();
  assert!(!badges.is_empty());
  assert!(badges.iter().all(|b| b["unlocked"] == json!(false)));

  let streak3 = badges
    .iter()
    .find(|b| b["id"] == json!("journal_streak_3"))
    .unwrap();
  assert_eq!(streak3["progress"], json!(0));
}

#[tokio::test]
async fn achievements_track_counts() {
  let app = app().await;
  let token = login(&app, "a@example.com").await;

  send(
    &app,
    "POST",
    "/api/journals",
    Some(&token),
    Some(json!({"note": "first"})),
  )
  .await;
  let start = Utc::now() - Duration::days(8);
  send(
    &app,
    "POST",
    "/api/sobriety",
    Some(&token),
    Some(json!({"start_date": start.to_rfc3339()})),
  )
  .await;

  let (_, body) =
    send(&app, "GET", "/api/achievements", Some(&token), None).await;
  let badges = body.as_array().unwrap();

  let journal_1 = badges.iter().find(|b| b["id"] == json!("journal_1")).unwrap();
  assert_eq!(journal_1["unlocked"], json!(true));

  let sober_7 = badges.iter().find(|b| b["id"] == json!("sober_7")).unwrap();
  assert_eq!(sober_7["unlocked"], json!(true));
  let sober_30 = badges.iter().find(|b| b["id"] == json!("sober_30")).unwrap();
  assert_eq!(sober_30["unlocked"], json!(false));
  assert_eq!(sober_30["progress"], json!(8));
}
