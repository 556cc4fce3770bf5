//! Handlers for `/journals` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/journals` | `{"entries":[...]}`, newest date first |
//! | `POST`   | `/journals` | 201; `date` defaults to now |
//! | `DELETE` | `/journals/:id` | 204; 404 on absent or cross-user id |

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use steady_core::{
  journal::{JournalEntry, NewJournalEntry},
  store::RecoveryStore,
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError, extract::Json};

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
  pub entries: Vec<JournalEntry>,
}

/// `GET /journals`
pub async fn list<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
) -> Result<Json<EntriesResponse>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .list_entries(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(EntriesResponse { entries }))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub date:        Option<DateTime<Utc>>,
  pub mood_rating: Option<i32>,
  pub note:        Option<String>,
  #[serde(default)]
  pub trigger_ids: Vec<Uuid>,
}

/// `POST /journals`
pub async fn create<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = state
    .store
    .record_entry(user_id, NewJournalEntry {
      date:        body.date,
      mood_rating: body.mood_rating,
      note:        body.note,
      trigger_ids: body.trigger_ids,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(entry)))
}

/// `DELETE /journals/:id`
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
    .delete_entry(user_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !deleted {
    return Err(ApiError::NotFound(format!("journal entry {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
