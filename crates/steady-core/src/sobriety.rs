//! Sobriety log and derived streak.
//!
//! The log stores only `start_date` and the relapse history. The streak is
//! computed at read time and never persisted; a relapse is the single state
//! transition that resets it, by moving `start_date` to the relapse moment
//! and appending one immutable [`RelapseRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reason stored when the user logs a relapse without giving one.
pub const DEFAULT_RELAPSE_REASON: &str = "not specified";

/// One relapse event. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelapseRecord {
  pub date:     DateTime<Utc>,
  pub reason:   String,
  /// Trigger *names* snapshotted at record time. Deliberately not ids:
  /// later renames or deletes must not rewrite history.
  pub triggers: Vec<String>,
}

/// The persisted per-user log. One row per user, created lazily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SobrietyLog {
  pub user_id:    Uuid,
  pub start_date: DateTime<Utc>,
  pub relapses:   Vec<RelapseRecord>,
}

impl SobrietyLog {
  /// Whole 24-hour periods elapsed since `start_date`, floored, never
  /// negative. A user 23 hours in shows streak 0; a `start_date` in the
  /// future clamps to 0.
  pub fn streak_at(&self, now: DateTime<Utc>) -> i64 {
    (now - self.start_date).num_days().max(0)
  }

  /// Assemble the read model for `now`.
  pub fn view_at(&self, now: DateTime<Utc>) -> SobrietyView {
    SobrietyView {
      user_id:        self.user_id,
      start_date:     self.start_date,
      current_streak: self.streak_at(now),
      relapses:       self.relapses.clone(),
    }
  }
}

/// The computed read model — never stored, always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SobrietyView {
  pub user_id:        Uuid,
  pub start_date:     DateTime<Utc>,
  pub current_streak: i64,
  pub relapses:       Vec<RelapseRecord>,
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn log(start: DateTime<Utc>) -> SobrietyLog {
    SobrietyLog {
      user_id:    Uuid::new_v4(),
      start_date: start,
      relapses:   vec![],
    }
  }

  #[test]
  fn streak_floors_partial_days() {
    let now = Utc::now();
    assert_eq!(log(now - Duration::hours(23)).streak_at(now), 0);
    assert_eq!(log(now - Duration::hours(24)).streak_at(now), 1);
    assert_eq!(log(now - Duration::hours(47)).streak_at(now), 1);
  }

  #[test]
  fn streak_ten_days() {
    let now = Utc::now();
    assert_eq!(log(now - Duration::days(10)).streak_at(now), 10);
  }

  #[test]
  fn future_start_date_clamps_to_zero() {
    let now = Utc::now();
    assert_eq!(log(now + Duration::days(3)).streak_at(now), 0);
  }

  #[test]
  fn view_carries_derived_streak() {
    let now = Utc::now();
    let l = log(now - Duration::days(42));
    let view = l.view_at(now);
    assert_eq!(view.current_streak, 42);
    assert_eq!(view.start_date, l.start_date);
  }
}
