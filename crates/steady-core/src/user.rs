//! User accounts.
//!
//! The password hash lives in [`StoredUser`], which never crosses the API
//! boundary; handlers serialize only the inner [`User`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public account identity, safe to serialize in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// A user row as persisted, including the argon2 PHC string.
#[derive(Debug, Clone)]
pub struct StoredUser {
  pub user:          User,
  pub password_hash: String,
}
