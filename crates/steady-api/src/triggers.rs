//! Handlers for `/triggers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/triggers` | Sorted by name |
//! | `POST`   | `/triggers` | 400 if name missing, 201 on create |
//! | `PUT`    | `/triggers/:id` | 404 on absent or cross-user id |
//! | `DELETE` | `/triggers/:id` | 204; 404 on absent or cross-user id |

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use steady_core::{
  store::RecoveryStore,
  trigger::{NewTrigger, Trigger, TriggerCategory},
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError, extract::Json};

#[derive(Debug, Deserialize)]
pub struct TriggerBody {
  pub name:     String,
  #[serde(default)]
  pub category: TriggerCategory,
}

impl TriggerBody {
  fn validate(self) -> Result<NewTrigger, ApiError> {
    let name = self.name.trim().to_owned();
    if name.is_empty() {
      return Err(ApiError::BadRequest("trigger name is required".to_owned()));
    }
    Ok(NewTrigger { name, category: self.category })
  }
}

/// `GET /triggers`
pub async fn list<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Trigger>>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let triggers = state
    .store
    .list_triggers(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(triggers))
}

/// `POST /triggers` — body: `{"name":"...","category":"emotional"}`
pub async fn create<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Json(body): Json<TriggerBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let trigger = state
    .store
    .create_trigger(user_id, body.validate()?)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(trigger)))
}

/// `PUT /triggers/:id`
pub async fn update<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TriggerBody>,
) -> Result<Json<Trigger>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let trigger = state
    .store
    .update_trigger(user_id, id, body.validate()?)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("trigger {id} not found")))?;
  Ok(Json(trigger))
}

/// `DELETE /triggers/:id`
pub async fn delete<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_trigger(user_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !deleted {
    return Err(ApiError::NotFound(format!("trigger {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
