//! The `RecoveryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `steady-store-sqlite`).
//! The HTTP layer (`steady-api`) depends on this abstraction, not on any
//! concrete backend.
//!
//! Every operation is scoped to a `user_id`; implementations must never let
//! one user's rows leak into another's results. "Not found" for reads of
//! rows owned by a different user is expressed as `Ok(None)` / `Ok(false)`,
//! indistinguishable from a genuinely absent row.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  exercise::{Exercise, NewExercise},
  journal::{JournalEntry, NewJournalEntry},
  sobriety::{RelapseRecord, SobrietyLog},
  trigger::{NewTrigger, Trigger},
  user::StoredUser,
};

/// Abstraction over a Steady storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecoveryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create an account. Returns an error if the email is already taken.
  fn create_user(
    &self,
    email: String,
    password_hash: String,
  ) -> impl Future<Output = Result<StoredUser, Self::Error>> + Send + '_;

  /// Look up an account by email. Returns `None` if unseen.
  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<StoredUser>, Self::Error>> + Send + '_;

  // ── Journal ───────────────────────────────────────────────────────────

  /// All entries for `user_id`, newest `date` first.
  fn list_entries(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JournalEntry>, Self::Error>> + Send + '_;

  /// Persist a new entry. `date` defaults to now; `created_at` is set by
  /// the store.
  fn record_entry(
    &self,
    user_id: Uuid,
    input: NewJournalEntry,
  ) -> impl Future<Output = Result<JournalEntry, Self::Error>> + Send + '_;

  /// Delete an entry. Returns `false` if absent or owned by another user.
  fn delete_entry(
    &self,
    user_id: Uuid,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── CBT exercises ─────────────────────────────────────────────────────

  /// All completed exercises for `user_id`, newest first.
  fn list_exercises(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Exercise>, Self::Error>> + Send + '_;

  /// Record a completed exercise; `completed_at` is set by the store.
  fn record_exercise(
    &self,
    user_id: Uuid,
    input: NewExercise,
  ) -> impl Future<Output = Result<Exercise, Self::Error>> + Send + '_;

  // ── Triggers ──────────────────────────────────────────────────────────

  /// All triggers for `user_id`, sorted by name.
  fn list_triggers(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Trigger>, Self::Error>> + Send + '_;

  fn create_trigger(
    &self,
    user_id: Uuid,
    input: NewTrigger,
  ) -> impl Future<Output = Result<Trigger, Self::Error>> + Send + '_;

  /// Replace name and category. Returns `None` if absent or owned by
  /// another user.
  fn update_trigger(
    &self,
    user_id: Uuid,
    trigger_id: Uuid,
    input: NewTrigger,
  ) -> impl Future<Output = Result<Option<Trigger>, Self::Error>> + Send + '_;

  /// Delete a trigger. Historical relapse records that snapshotted its name
  /// are unaffected. Returns `false` if absent or owned by another user.
  fn delete_trigger(
    &self,
    user_id: Uuid,
    trigger_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Sobriety ──────────────────────────────────────────────────────────

  /// The user's log, or `None` if never initialized (a 404 at the API,
  /// distinct from a zero streak).
  fn get_log(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<SobrietyLog>, Self::Error>> + Send + '_;

  /// Replace `start_date` and the relapse history wholesale. No
  /// partial-field semantics; callers resend the full history.
  fn upsert_log(
    &self,
    user_id: Uuid,
    start_date: DateTime<Utc>,
    relapses: Vec<RelapseRecord>,
  ) -> impl Future<Output = Result<SobrietyLog, Self::Error>> + Send + '_;

  /// The relapse state transition: atomically snapshot the named triggers,
  /// append one [`RelapseRecord`] dated now, and set `start_date = now`
  /// (so the derived streak resets to 0). Initializes a missing log first.
  /// Trigger ids that do not exist or belong to another user are skipped.
  fn record_relapse(
    &self,
    user_id: Uuid,
    reason: Option<String>,
    trigger_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<SobrietyLog, Self::Error>> + Send + '_;
}
