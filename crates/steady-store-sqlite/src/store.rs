//! [`SqliteStore`] — the SQLite implementation of [`RecoveryStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use steady_core::{
  exercise::{Exercise, NewExercise},
  journal::{JournalEntry, NewJournalEntry},
  sobriety::{DEFAULT_RELAPSE_REASON, RelapseRecord, SobrietyLog},
  store::RecoveryStore,
  trigger::{NewTrigger, Trigger},
  user::{StoredUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawEntry, RawExercise, RawLog, RawTrigger, RawUser, encode_category,
    encode_dt, encode_relapses, encode_trigger_ids, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Steady store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All access
/// runs serially on the connection's thread, which makes multi-step
/// read-modify-write operations (the relapse transition) atomic with respect
/// to each other.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecoveryStore impl ──────────────────────────────────────────────────────

impl RecoveryStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(
    &self,
    email: String,
    password_hash: String,
  ) -> Result<StoredUser> {
    let user = User {
      user_id:    Uuid::new_v4(),
      email:      email.clone(),
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);
    let email_arg = email.clone();
    let hash = password_hash.clone();

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email_arg],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email_arg, hash, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::EmailTaken(email));
    }

    Ok(StoredUser { user, password_hash })
  }

  async fn find_user_by_email(
    &self,
    email: String,
  ) -> Result<Option<StoredUser>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, password_hash, created_at
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(RawUser {
                  user_id:       row.get(0)?,
                  email:         row.get(1)?,
                  password_hash: row.get(2)?,
                  created_at:    row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_stored_user).transpose()
  }

  // ── Journal ───────────────────────────────────────────────────────────────

  async fn list_entries(&self, user_id: Uuid) -> Result<Vec<JournalEntry>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, user_id, date, mood_rating, note, trigger_ids,
                  created_at
           FROM journals
           WHERE user_id = ?1
           ORDER BY date DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawEntry {
              entry_id:    row.get(0)?,
              user_id:     row.get(1)?,
              date:        row.get(2)?,
              mood_rating: row.get(3)?,
              note:        row.get(4)?,
              trigger_ids: row.get(5)?,
              created_at:  row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn record_entry(
    &self,
    user_id: Uuid,
    input: NewJournalEntry,
  ) -> Result<JournalEntry> {
    let now = Utc::now();
    let entry = JournalEntry {
      entry_id:    Uuid::new_v4(),
      user_id,
      date:        input.date.unwrap_or(now),
      mood_rating: input.mood_rating,
      note:        input.note,
      trigger_ids: input.trigger_ids,
      created_at:  now,
    };

    let entry_id_str = encode_uuid(entry.entry_id);
    let user_id_str = encode_uuid(user_id);
    let date_str = encode_dt(entry.date);
    let created_str = encode_dt(entry.created_at);
    let trigger_ids_str = encode_trigger_ids(&entry.trigger_ids)?;
    let mood = entry.mood_rating;
    let note = entry.note.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO journals (
             entry_id, user_id, date, mood_rating, note, trigger_ids,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            entry_id_str,
            user_id_str,
            date_str,
            mood,
            note,
            trigger_ids_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<bool> {
    let user_id_str = encode_uuid(user_id);
    let entry_id_str = encode_uuid(entry_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM journals WHERE entry_id = ?1 AND user_id = ?2",
          rusqlite::params![entry_id_str, user_id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── CBT exercises ─────────────────────────────────────────────────────────

  async fn list_exercises(&self, user_id: Uuid) -> Result<Vec<Exercise>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawExercise> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT exercise_id, user_id, kind, content, completed_at
           FROM cbt_exercises
           WHERE user_id = ?1
           ORDER BY completed_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawExercise {
              exercise_id:  row.get(0)?,
              user_id:      row.get(1)?,
              kind:         row.get(2)?,
              content:      row.get(3)?,
              completed_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExercise::into_exercise).collect()
  }

  async fn record_exercise(
    &self,
    user_id: Uuid,
    input: NewExercise,
  ) -> Result<Exercise> {
    let exercise = Exercise {
      exercise_id:  Uuid::new_v4(),
      user_id,
      kind:         input.kind,
      content:      input.content,
      completed_at: Utc::now(),
    };

    let exercise_id_str = encode_uuid(exercise.exercise_id);
    let user_id_str = encode_uuid(user_id);
    let kind = exercise.kind.clone();
    let content_str = serde_json::to_string(&exercise.content)?;
    let at_str = encode_dt(exercise.completed_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cbt_exercises (
             exercise_id, user_id, kind, content, completed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![exercise_id_str, user_id_str, kind, content_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(exercise)
  }

  // ── Triggers ──────────────────────────────────────────────────────────────

  async fn list_triggers(&self, user_id: Uuid) -> Result<Vec<Trigger>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawTrigger> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT trigger_id, user_id, name, category
           FROM triggers
           WHERE user_id = ?1
           ORDER BY name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawTrigger {
              trigger_id: row.get(0)?,
              user_id:    row.get(1)?,
              name:       row.get(2)?,
              category:   row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTrigger::into_trigger).collect()
  }

  async fn create_trigger(
    &self,
    user_id: Uuid,
    input: NewTrigger,
  ) -> Result<Trigger> {
    let trigger = Trigger {
      trigger_id: Uuid::new_v4(),
      user_id,
      name: input.name,
      category: input.category,
    };

    let trigger_id_str = encode_uuid(trigger.trigger_id);
    let user_id_str = encode_uuid(user_id);
    let name = trigger.name.clone();
    let category_str = encode_category(trigger.category).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO triggers (trigger_id, user_id, name, category)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![trigger_id_str, user_id_str, name, category_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(trigger)
  }

  async fn update_trigger(
    &self,
    user_id: Uuid,
    trigger_id: Uuid,
    input: NewTrigger,
  ) -> Result<Option<Trigger>> {
    let trigger_id_str = encode_uuid(trigger_id);
    let user_id_str = encode_uuid(user_id);
    let name = input.name.clone();
    let category_str = encode_category(input.category).to_owned();

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE triggers SET name = ?1, category = ?2
           WHERE trigger_id = ?3 AND user_id = ?4",
          rusqlite::params![name, category_str, trigger_id_str, user_id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }

    Ok(Some(Trigger {
      trigger_id,
      user_id,
      name: input.name,
      category: input.category,
    }))
  }

  async fn delete_trigger(
    &self,
    user_id: Uuid,
    trigger_id: Uuid,
  ) -> Result<bool> {
    let trigger_id_str = encode_uuid(trigger_id);
    let user_id_str = encode_uuid(user_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM triggers WHERE trigger_id = ?1 AND user_id = ?2",
          rusqlite::params![trigger_id_str, user_id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Sobriety ──────────────────────────────────────────────────────────────

  async fn get_log(&self, user_id: Uuid) -> Result<Option<SobrietyLog>> {
    let user_id_str = encode_uuid(user_id);

    let raw: Option<RawLog> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, start_date, relapses
               FROM sobriety_logs WHERE user_id = ?1",
              rusqlite::params![user_id_str],
              |row| {
                Ok(RawLog {
                  user_id:    row.get(0)?,
                  start_date: row.get(1)?,
                  relapses:   row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLog::into_log).transpose()
  }

  async fn upsert_log(
    &self,
    user_id: Uuid,
    start_date: DateTime<Utc>,
    relapses: Vec<RelapseRecord>,
  ) -> Result<SobrietyLog> {
    let log = SobrietyLog { user_id, start_date, relapses };

    let user_id_str = encode_uuid(user_id);
    let start_str = encode_dt(start_date);
    let relapses_str = encode_relapses(&log.relapses)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sobriety_logs (user_id, start_date, relapses)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(user_id) DO UPDATE SET
             start_date = excluded.start_date,
             relapses   = excluded.relapses",
          rusqlite::params![user_id_str, start_str, relapses_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(log)
  }

  async fn record_relapse(
    &self,
    user_id: Uuid,
    reason: Option<String>,
    trigger_ids: Vec<Uuid>,
  ) -> Result<SobrietyLog> {
    let now = Utc::now();
    let reason =
      reason.unwrap_or_else(|| DEFAULT_RELAPSE_REASON.to_owned());

    let user_id_str = encode_uuid(user_id);
    let now_str = encode_dt(now);
    let id_strs: Vec<String> =
      trigger_ids.iter().copied().map(encode_uuid).collect();

    // The whole transition runs inside one transaction on the connection
    // thread: snapshot names, append the record, reset start_date.
    let relapses_json: String = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Snapshot trigger names at call time. Unknown or cross-user ids
        // are skipped.
        let mut names: Vec<String> = Vec::with_capacity(id_strs.len());
        {
          let mut stmt = tx.prepare(
            "SELECT name FROM triggers WHERE trigger_id = ?1 AND user_id = ?2",
          )?;
          for id in &id_strs {
            if let Some(name) = stmt
              .query_row(rusqlite::params![id, user_id_str], |row| {
                row.get::<_, String>(0)
              })
              .optional()?
            {
              names.push(name);
            }
          }
        }

        let existing: Option<String> = tx
          .query_row(
            "SELECT relapses FROM sobriety_logs WHERE user_id = ?1",
            rusqlite::params![user_id_str],
            |row| row.get(0),
          )
          .optional()?;

        let mut relapses: Vec<RelapseRecord> = match existing {
          Some(json) => serde_json::from_str(&json)
            .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?,
          None => vec![],
        };
        relapses.push(RelapseRecord {
          date: now,
          reason,
          triggers: names,
        });

        let relapses_json = serde_json::to_string(&relapses)
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;

        tx.execute(
          "INSERT INTO sobriety_logs (user_id, start_date, relapses)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(user_id) DO UPDATE SET
             start_date = excluded.start_date,
             relapses   = excluded.relapses",
          rusqlite::params![user_id_str, now_str, relapses_json],
        )?;

        tx.commit()?;
        Ok(relapses_json)
      })
      .await?;

    Ok(SobrietyLog {
      user_id,
      start_date: now,
      relapses: crate::encode::decode_relapses(&relapses_json)?,
    })
  }
}
