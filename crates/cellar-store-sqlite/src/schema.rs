//! SQL schema for the Cellar SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Listing order is rowid order, i.e. insertion order.
CREATE TABLE IF NOT EXISTS wines (
    wine_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    style         TEXT NOT NULL,
    grapes        TEXT NOT NULL DEFAULT '[]',   -- JSON array, display order
    location      TEXT NOT NULL,
    vendor        TEXT NOT NULL,
    purchase_date TEXT NOT NULL,                -- YYYY-MM-DD
    drink_by      TEXT,                         -- YYYY-MM-DD or NULL
    price         INTEGER NOT NULL CHECK (price BETWEEN 1 AND 4),
    notes         TEXT,
    image         TEXT,
    created_at    TEXT NOT NULL,                -- RFC 3339 UTC
    updated_at    TEXT NOT NULL
);

-- Presence of a row archives the wine. At most one per wine, never removed
-- except together with the wine itself.
CREATE TABLE IF NOT EXISTS consumptions (
    wine_id         TEXT PRIMARY KEY REFERENCES wines(wine_id) ON DELETE CASCADE,
    rating          INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    drank_at        TEXT NOT NULL,
    would_buy_again INTEGER NOT NULL,
    food_pairings   TEXT NOT NULL DEFAULT '[]',
    experience      TEXT
);

CREATE INDEX IF NOT EXISTS wines_style_idx ON wines(style);

PRAGMA user_version = 1;
";
