//! Achievement (badge) projection.
//!
//! Badges are computed from counts of existing entities and are never
//! persisted. Evaluation is a pure function: calling it twice with the same
//! inputs yields the same ordered list, and a badge only "un-unlocks" when
//! its driving counter itself decreases (e.g. a relapse resetting the
//! sobriety streak).

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// How far back the journaling-streak scan looks.
const JOURNAL_STREAK_WINDOW_DAYS: u64 = 7;

/// A derived achievement indicator. Produced, never ingested, hence
/// serialize-only.
#[derive(Debug, Clone, Serialize)]
pub struct Badge {
  pub id:           &'static str,
  pub name:         &'static str,
  pub description:  &'static str,
  pub unlocked:     bool,
  pub progress:     i64,
  pub max_progress: i64,
}

/// The counters the projection is a function of.
#[derive(Debug, Clone, Default)]
pub struct AchievementInputs {
  /// Current sobriety streak in whole days.
  pub sobriety_days:  i64,
  /// Total journal entries.
  pub journal_count:  i64,
  /// Consecutive days with at least one journal entry, per
  /// [`journal_streak`].
  pub journal_streak: i64,
  /// Total completed CBT exercises.
  pub exercise_count: i64,
  /// Total triggers the user has defined.
  pub trigger_count:  i64,
}

/// Consecutive days with at least one entry, scanned backward from `today`.
///
/// A missing entry *today* does not break the streak (the day is not over
/// yet); the first gap on any earlier day does. The scan is capped at seven
/// days — the longest streak any badge cares about. Uses calendar days, not
/// 24-hour periods.
pub fn journal_streak(entry_dates: &[NaiveDate], today: NaiveDate) -> i64 {
  let days: HashSet<NaiveDate> = entry_dates.iter().copied().collect();

  let mut streak = 0;
  for i in 0..JOURNAL_STREAK_WINDOW_DAYS {
    let Some(day) = today.checked_sub_days(Days::new(i)) else {
      break;
    };
    if days.contains(&day) {
      streak += 1;
    } else if i > 0 {
      break;
    }
  }
  streak
}

fn badge(
  id: &'static str,
  name: &'static str,
  description: &'static str,
  counter: i64,
  threshold: i64,
) -> Badge {
  Badge {
    id,
    name,
    description,
    unlocked: counter >= threshold,
    progress: counter.min(threshold),
    max_progress: threshold,
  }
}

/// Evaluate the full badge catalogue for `inputs`.
pub fn evaluate(inputs: &AchievementInputs) -> Vec<Badge> {
  let sober = inputs.sobriety_days;
  let journals = inputs.journal_count;
  let jstreak = inputs.journal_streak;
  let exercises = inputs.exercise_count;
  let triggers = inputs.trigger_count;

  vec![
    badge("sober_1", "First day", "1 day sober", sober, 1),
    badge("sober_7", "One week strong", "7 days sober", sober, 7),
    badge("sober_30", "One month free", "30 days sober", sober, 30),
    badge("sober_90", "Quarter milestone", "90 days sober", sober, 90),
    badge("sober_365", "A full year", "365 days sober", sober, 365),
    badge("journal_1", "First thoughts", "First journal entry", journals, 1),
    badge("journal_10", "Reflection", "10 journal entries", journals, 10),
    badge(
      "journal_streak_3",
      "Building a habit",
      "3 consecutive days of journaling",
      jstreak,
      3,
    ),
    badge(
      "journal_streak_7",
      "A mindful week",
      "7 consecutive days of journaling",
      jstreak,
      7,
    ),
    badge("cbt_1", "First exercise", "First CBT exercise", exercises, 1),
    badge("cbt_5", "Practitioner", "5 CBT exercises", exercises, 5),
    badge("cbt_20", "Thought master", "20 CBT exercises", exercises, 20),
    badge(
      "triggers_3",
      "Self-knowledge",
      "3 triggers identified",
      triggers,
      3,
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn by_id<'a>(badges: &'a [Badge], id: &str) -> &'a Badge {
    badges.iter().find(|b| b.id == id).unwrap()
  }

  #[test]
  fn empty_inputs_lock_everything() {
    let badges = evaluate(&AchievementInputs::default());
    assert!(badges.iter().all(|b| !b.unlocked));
    assert!(badges.iter().all(|b| b.progress == 0));
  }

  #[test]
  fn zero_journal_entries_lock_streak_badges() {
    let badges = evaluate(&AchievementInputs::default());
    for id in ["journal_streak_3", "journal_streak_7"] {
      let b = by_id(&badges, id);
      assert!(!b.unlocked);
      assert_eq!(b.progress, 0);
    }
  }

  #[test]
  fn unlock_is_monotonic_at_the_seven_day_boundary() {
    let mut inputs = AchievementInputs {
      sobriety_days: 6,
      ..Default::default()
    };
    let badges = evaluate(&inputs);
    assert!(!by_id(&badges, "sober_7").unlocked);
    assert_eq!(by_id(&badges, "sober_7").progress, 6);

    inputs.sobriety_days = 7;
    let badges = evaluate(&inputs);
    assert!(by_id(&badges, "sober_7").unlocked);
    assert!(by_id(&badges, "sober_1").unlocked);
  }

  #[test]
  fn relapse_relocks_sobriety_badges_only() {
    let inputs = AchievementInputs {
      sobriety_days:  0,
      journal_count:  12,
      journal_streak: 3,
      exercise_count: 5,
      trigger_count:  4,
    };
    let badges = evaluate(&inputs);
    assert!(!by_id(&badges, "sober_1").unlocked);
    assert!(by_id(&badges, "journal_10").unlocked);
    assert!(by_id(&badges, "journal_streak_3").unlocked);
    assert!(by_id(&badges, "cbt_5").unlocked);
    assert!(by_id(&badges, "triggers_3").unlocked);
  }

  #[test]
  fn progress_caps_at_threshold() {
    let inputs = AchievementInputs {
      sobriety_days: 400,
      ..Default::default()
    };
    let badges = evaluate(&inputs);
    let year = by_id(&badges, "sober_365");
    assert!(year.unlocked);
    assert_eq!(year.progress, 365);
  }

  // ── journal_streak ──────────────────────────────────────────────────────

  fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn streak_counts_consecutive_days() {
    let today = d("2026-08-27");
    let dates =
      vec![d("2026-08-27"), d("2026-08-26"), d("2026-08-25")];
    assert_eq!(journal_streak(&dates, today), 3);
  }

  #[test]
  fn missing_today_does_not_break_streak() {
    let today = d("2026-08-27");
    let dates = vec![d("2026-08-26"), d("2026-08-25")];
    assert_eq!(journal_streak(&dates, today), 2);
  }

  #[test]
  fn gap_before_today_breaks_streak() {
    let today = d("2026-08-27");
    // Entry today, nothing yesterday, entry the day before.
    let dates = vec![d("2026-08-27"), d("2026-08-25")];
    assert_eq!(journal_streak(&dates, today), 1);
  }

  #[test]
  fn streak_caps_at_window() {
    let today = d("2026-08-27");
    let dates: Vec<NaiveDate> = (0..14)
      .map(|i| today.checked_sub_days(Days::new(i)).unwrap())
      .collect();
    assert_eq!(journal_streak(&dates, today), 7);
  }

  #[test]
  fn no_entries_means_zero() {
    assert_eq!(journal_streak(&[], d("2026-08-27")), 0);
  }

  #[test]
  fn duplicate_entries_on_one_day_count_once() {
    let today = d("2026-08-27");
    let dates = vec![d("2026-08-27"), d("2026-08-27")];
    assert_eq!(journal_streak(&dates, today), 1);
  }
}
