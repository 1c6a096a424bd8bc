//! SQL schema for the Marks SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`, so
/// running it on every open is safe.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    identity_id   TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,  -- lowercase
    password_hash TEXT NOT NULL,         -- argon2 PHC string
    created_at    INTEGER NOT NULL,      -- epoch millis
    last_login    INTEGER NOT NULL,
    is_active     INTEGER NOT NULL DEFAULT 1
);

-- One profile per identity; publicly readable, so no credential columns.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id TEXT PRIMARY KEY,
    owner      TEXT NOT NULL UNIQUE REFERENCES identities(identity_id),
    username   TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    name       TEXT,
    location   TEXT,
    website    TEXT,
    avatar     TEXT,
    bio        TEXT
);

-- Soft-state rows: the three flags flip, the row never leaves.
CREATE TABLE IF NOT EXISTS items (
    item_id    TEXT PRIMARY KEY,
    owner      TEXT NOT NULL REFERENCES identities(identity_id),
    username   TEXT NOT NULL,            -- denormalised owner username
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    url        TEXT NOT NULL,
    title      TEXT NOT NULL,
    tags       TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    liked      INTEGER NOT NULL DEFAULT 0,
    archived   INTEGER NOT NULL DEFAULT 0,
    deleted    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS profiles_username_idx ON profiles(username);
CREATE INDEX IF NOT EXISTS items_owner_idx       ON items(owner);
CREATE INDEX IF NOT EXISTS items_username_idx    ON items(username);
CREATE INDEX IF NOT EXISTS items_updated_idx     ON items(updated_at);

PRAGMA user_version = 1;
";
