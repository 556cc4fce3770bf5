//! SQL schema for the Steady SQLite store.
//!
//! Executed unconditionally at connection startup; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`. The schema records `PRAGMA user_version`
//! so future migrations can gate on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS journals (
    entry_id    TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    date        TEXT NOT NULL,              -- what the entry is about
    mood_rating INTEGER,
    note        TEXT,
    trigger_ids TEXT NOT NULL DEFAULT '[]', -- JSON array of uuids
    created_at  TEXT NOT NULL               -- server-assigned
);

-- Completed CBT exercises; append-only in practice.
CREATE TABLE IF NOT EXISTS cbt_exercises (
    exercise_id  TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    kind         TEXT NOT NULL,   -- e.g. 'thought_record', 'abc'
    content      TEXT NOT NULL,   -- free-form JSON payload
    completed_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS triggers (
    trigger_id TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    category   TEXT NOT NULL DEFAULT 'general'
);

-- One row per user. current_streak is never stored; it is derived from
-- start_date on every read. Relapse records snapshot trigger *names*, so
-- trigger renames and deletes never rewrite this history.
CREATE TABLE IF NOT EXISTS sobriety_logs (
    user_id    TEXT PRIMARY KEY REFERENCES users(user_id) ON DELETE CASCADE,
    start_date TEXT NOT NULL,
    relapses   TEXT NOT NULL DEFAULT '[]'  -- JSON array of RelapseRecord
);

CREATE INDEX IF NOT EXISTS journals_user_idx ON journals(user_id);
CREATE INDEX IF NOT EXISTS journals_date_idx ON journals(date);
CREATE INDEX IF NOT EXISTS cbt_user_idx      ON cbt_exercises(user_id);
CREATE INDEX IF NOT EXISTS triggers_user_idx ON triggers(user_id);

PRAGMA user_version = 1;
";
