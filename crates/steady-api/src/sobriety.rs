//! Handlers for `/sobriety` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sobriety` | 404 until the log is first written |
//! | `POST` | `/sobriety` | Wholesale replace of start date + history |
//! | `POST` | `/sobriety/relapse` | Atomic relapse transition |
//!
//! Every response is a [`SobrietyView`] with the streak freshly derived;
//! the streak is never read from storage.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use steady_core::{
  sobriety::{RelapseRecord, SobrietyView},
  store::RecoveryStore,
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError, extract::Json};

// ─── Get ─────────────────────────────────────────────────────────────────────

/// `GET /sobriety`
pub async fn get_log<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
) -> Result<Json<SobrietyView>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let log = state
    .store
    .get_log(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound("sobriety log not initialized".to_owned())
    })?;
  Ok(Json(log.view_at(Utc::now())))
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
  pub start_date: DateTime<Utc>,
  #[serde(default, alias = "relapses_json")]
  pub relapses:   Vec<RelapseRecord>,
}

/// `POST /sobriety` — full replace; callers resend the whole relapse
/// history. No partial-field update semantics.
pub async fn upsert_log<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Json(body): Json<UpsertBody>,
) -> Result<Json<SobrietyView>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let log = state
    .store
    .upsert_log(user_id, body.start_date, body.relapses)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(log.view_at(Utc::now())))
}

// ─── Relapse ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct RelapseBody {
  pub reason:      Option<String>,
  #[serde(default)]
  pub trigger_ids: Vec<Uuid>,
}

/// `POST /sobriety/relapse` — body: `{"reason":"...","trigger_ids":[...]}`
/// (both optional).
///
/// Snapshots trigger names, appends one relapse record dated now, and moves
/// `start_date` to now, so the returned view always shows
/// `current_streak == 0`.
pub async fn record_relapse<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
  Json(body): Json<RelapseBody>,
) -> Result<Json<SobrietyView>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let log = state
    .store
    .record_relapse(user_id, body.reason, body.trigger_ids)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(log.view_at(Utc::now())))
}
