//! SQL schema for the registry SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Ids are per table: an adult and a child may share one.
CREATE TABLE IF NOT EXISTS adults (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    nic         TEXT NOT NULL UNIQUE,   -- never updated after insert
    gender      TEXT NOT NULL,
    dob         TEXT NOT NULL,          -- YYYY-MM-DD
    address     TEXT NOT NULL DEFAULT '',
    occupation  TEXT NOT NULL DEFAULT '',
    contact     TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL           -- RFC 3339 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS children (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    gender      TEXT NOT NULL,
    dob         TEXT NOT NULL,
    parent_nic  TEXT NOT NULL,          -- by value; no foreign key
    school      TEXT NOT NULL DEFAULT '',
    grade       TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS children_parent_idx ON children(parent_nic);

PRAGMA user_version = 1;
";
