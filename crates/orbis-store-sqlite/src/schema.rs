//! SQL schema for the Orbis SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS countries (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT    NOT NULL,
    name_key          TEXT    NOT NULL UNIQUE,  -- lowercase name; upsert target
    capital           TEXT,
    region            TEXT,
    population        INTEGER NOT NULL CHECK (population >= 0),
    currency_code     TEXT,
    exchange_rate     REAL,
    estimated_gdp     REAL,
    flag_url          TEXT,
    last_refreshed_at TEXT    NOT NULL          -- RFC 3339 UTC, fixed width
);

CREATE INDEX IF NOT EXISTS countries_region_idx   ON countries(region);
CREATE INDEX IF NOT EXISTS countries_currency_idx ON countries(currency_code);

PRAGMA user_version = 1;
";
