//! Handler for `GET /achievements`.
//!
//! Badges are a pure projection over the user's current counts; nothing is
//! persisted and recomputing is idempotent. The same four inputs the
//! original client derived locally are gathered here from the store.

use axum::{Json, extract::State};
use chrono::Utc;
use steady_core::{
  achievements::{self, AchievementInputs, Badge},
  store::RecoveryStore,
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

/// `GET /achievements` — the full ordered badge catalogue.
pub async fn list<S>(
  CurrentUser(user_id): CurrentUser,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Badge>>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let store = &state.store;
  let now = Utc::now();

  let log = store
    .get_log(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let entries = store
    .list_entries(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let exercises = store
    .list_exercises(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let triggers = store
    .list_triggers(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let entry_dates: Vec<chrono::NaiveDate> =
    entries.iter().map(|e| e.date.date_naive()).collect();

  let inputs = AchievementInputs {
    sobriety_days:  log.map(|l| l.streak_at(now)).unwrap_or(0),
    journal_count:  entries.len() as i64,
    journal_streak: achievements::journal_streak(
      &entry_dates,
      now.date_naive(),
    ),
    exercise_count: exercises.len() as i64,
    trigger_count:  triggers.len() as i64,
  };

  Ok(Json(achievements::evaluate(&inputs)))
}
