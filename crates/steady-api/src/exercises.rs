//! Handlers for `/cbt` endpoints — completed CBT exercises, append-only.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use steady_core::{
  exercise::{Exercise, NewExercise},
  store::RecoveryStore,
};

use crate::{AppState, auth::CurrentUser, error::ApiError, extract::Json};

/// `GET /cbt` — newest completion first.
pub async fn list<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Exercise>>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let exercises = state
    .store
    .list_exercises(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(exercises))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub kind:    Option<String>,
  pub content: Option<serde_json::Value>,
}

/// `POST /cbt` — body: `{"kind":"thought_record","content":{...}}`
pub async fn create<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let kind = body.kind.map(|k| k.trim().to_owned()).unwrap_or_default();
  let content = match body.content {
    Some(c) if !kind.is_empty() => c,
    _ => {
      return Err(ApiError::BadRequest(
        "exercise kind and content are required".to_owned(),
      ));
    }
  };

  let exercise = state
    .store
    .record_exercise(user_id, NewExercise { kind, content })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(exercise)))
}
