//! Triggers — user-defined situational or emotional tags.
//!
//! Journal entries reference triggers by id. Relapse records store a *name
//! snapshot* instead, so renaming or deleting a trigger never rewrites
//! history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broad grouping for a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerCategory {
  #[default]
  General,
  Emotional,
  Environmental,
  Social,
}

/// A named trigger owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
  pub trigger_id: Uuid,
  pub user_id:    Uuid,
  pub name:       String,
  pub category:   TriggerCategory,
}

/// Input for creating or replacing a trigger.
#[derive(Debug, Clone)]
pub struct NewTrigger {
  pub name:     String,
  pub category: TriggerCategory,
}
