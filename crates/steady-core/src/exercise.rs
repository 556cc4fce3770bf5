//! Completed CBT exercises.
//!
//! Exercise content is free-form JSON; the shape varies per exercise kind
//! (thought records, ABC analyses, coping cards) and the store does not
//! interpret it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed exercise. Append-only in practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
  pub exercise_id:  Uuid,
  pub user_id:      Uuid,
  /// Exercise kind discriminant, e.g. `"thought_record"` or `"abc"`.
  pub kind:         String,
  pub content:      serde_json::Value,
  pub completed_at: DateTime<Utc>,
}

/// Input for [`record_exercise`](crate::store::RecoveryStore::record_exercise).
/// `completed_at` is set by the store.
#[derive(Debug, Clone)]
pub struct NewExercise {
  pub kind:    String,
  pub content: serde_json::Value,
}
