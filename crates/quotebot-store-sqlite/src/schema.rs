//! SQL schema for the quotebot SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS guilds (
    guild_id    TEXT PRIMARY KEY,
    platform_id TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- One row per (platform account, guild).
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    platform_id TEXT NOT NULL,
    name        TEXT NOT NULL,
    guild_id    TEXT NOT NULL REFERENCES guilds(guild_id),
    created_at  TEXT NOT NULL,
    UNIQUE (platform_id, guild_id)
);

-- Quotes are never updated or deleted.
CREATE TABLE IF NOT EXISTS quotes (
    quote_id     TEXT PRIMARY KEY,
    content      TEXT NOT NULL CHECK (length(trim(content)) > 0),
    speaker_id   TEXT NOT NULL REFERENCES users(user_id),
    submitter_id TEXT NOT NULL REFERENCES users(user_id),
    guild_id     TEXT NOT NULL REFERENCES guilds(guild_id),
    created_at   TEXT NOT NULL,
    UNIQUE (content, speaker_id)
);

CREATE INDEX IF NOT EXISTS users_name_idx     ON users(guild_id, name);
CREATE INDEX IF NOT EXISTS quotes_guild_idx   ON quotes(guild_id, speaker_id);

PRAGMA user_version = 1;
";
