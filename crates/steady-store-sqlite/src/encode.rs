//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (relapse
//! history, trigger-id lists, exercise content) are stored as compact JSON.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use steady_core::{
  exercise::Exercise,
  journal::JournalEntry,
  sobriety::{RelapseRecord, SobrietyLog},
  trigger::{Trigger, TriggerCategory},
  user::{StoredUser, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── TriggerCategory ─────────────────────────────────────────────────────────

pub fn encode_category(c: TriggerCategory) -> &'static str {
  match c {
    TriggerCategory::General => "general",
    TriggerCategory::Emotional => "emotional",
    TriggerCategory::Environmental => "environmental",
    TriggerCategory::Social => "social",
  }
}

pub fn decode_category(s: &str) -> Result<TriggerCategory> {
  match s {
    "general" => Ok(TriggerCategory::General),
    "emotional" => Ok(TriggerCategory::Emotional),
    "environmental" => Ok(TriggerCategory::Environmental),
    "social" => Ok(TriggerCategory::Social),
    other => {
      Err(steady_core::Error::UnknownCategory(other.to_owned()).into())
    }
  }
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_trigger_ids(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_trigger_ids(s: &str) -> Result<Vec<Uuid>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_relapses(relapses: &[RelapseRecord]) -> Result<String> {
  Ok(serde_json::to_string(relapses)?)
}

pub fn decode_relapses(s: &str) -> Result<Vec<RelapseRecord>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_stored_user(self) -> Result<StoredUser> {
    Ok(StoredUser {
      user:          User {
        user_id:    decode_uuid(&self.user_id)?,
        email:      self.email,
        created_at: decode_dt(&self.created_at)?,
      },
      password_hash: self.password_hash,
    })
  }
}

/// Raw strings read directly from a `journals` row.
pub struct RawEntry {
  pub entry_id:    String,
  pub user_id:     String,
  pub date:        String,
  pub mood_rating: Option<i32>,
  pub note:        Option<String>,
  pub trigger_ids: String,
  pub created_at:  String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<JournalEntry> {
    Ok(JournalEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      date:        decode_dt(&self.date)?,
      mood_rating: self.mood_rating,
      note:        self.note,
      trigger_ids: decode_trigger_ids(&self.trigger_ids)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `cbt_exercises` row.
pub struct RawExercise {
  pub exercise_id:  String,
  pub user_id:      String,
  pub kind:         String,
  pub content:      String,
  pub completed_at: String,
}

impl RawExercise {
  pub fn into_exercise(self) -> Result<Exercise> {
    Ok(Exercise {
      exercise_id:  decode_uuid(&self.exercise_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      kind:         self.kind,
      content:      serde_json::from_str(&self.content)?,
      completed_at: decode_dt(&self.completed_at)?,
    })
  }
}

/// Raw strings read directly from a `triggers` row.
pub struct RawTrigger {
  pub trigger_id: String,
  pub user_id:    String,
  pub name:       String,
  pub category:   String,
}

impl RawTrigger {
  pub fn into_trigger(self) -> Result<Trigger> {
    Ok(Trigger {
      trigger_id: decode_uuid(&self.trigger_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      category:   decode_category(&self.category)?,
    })
  }
}

/// Raw strings read directly from a `sobriety_logs` row.
pub struct RawLog {
  pub user_id:    String,
  pub start_date: String,
  pub relapses:   String,
}

impl RawLog {
  pub fn into_log(self) -> Result<SobrietyLog> {
    Ok(SobrietyLog {
      user_id:    decode_uuid(&self.user_id)?,
      start_date: decode_dt(&self.start_date)?,
      relapses:   decode_relapses(&self.relapses)?,
    })
  }
}
