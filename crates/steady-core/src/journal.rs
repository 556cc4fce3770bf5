//! Journal entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated mood/note entry, optionally tagged with trigger ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
  pub entry_id:    Uuid,
  pub user_id:     Uuid,
  /// When the entry is *about* — distinct from when it was recorded.
  pub date:        DateTime<Utc>,
  pub mood_rating: Option<i32>,
  pub note:        Option<String>,
  pub trigger_ids: Vec<Uuid>,
  pub created_at:  DateTime<Utc>,
}

/// Input for [`record_entry`](crate::store::RecoveryStore::record_entry).
/// `date` defaults to now when omitted by the caller.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
  pub date:        Option<DateTime<Utc>>,
  pub mood_rating: Option<i32>,
  pub note:        Option<String>,
  pub trigger_ids: Vec<Uuid>,
}
