//! SQL schema for the feed cache store.
//!
//! Executed once at connection startup. Future migrations will be gated
//! on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per feed. `save` replaces the row wholesale; there is no
-- expiry column on purpose — staleness is governed by refresh cadence,
-- and fetched_at is diagnostic metadata only.
CREATE TABLE IF NOT EXISTS feed_cache (
    feed        TEXT PRIMARY KEY,   -- 'weather' | 'dust' | 'meal' | 'calendar' | 'timetable'
    payload     TEXT NOT NULL,      -- JSON payload as cached
    fetched_at  TEXT NOT NULL       -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
