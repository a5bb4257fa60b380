//! SQL schema for the tracker SQLite store.
//!
//! Executed on every open. The database file is recreated at each process
//! start, so there is no migration path between versions.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Created once from the placemark import; never deleted.
CREATE TABLE IF NOT EXISTS locations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    latitude    REAL    NOT NULL,
    longitude   REAL    NOT NULL,
    is_preached INTEGER NOT NULL DEFAULT 0   -- only ever set to 1
);

-- Deleted teams keep their row so history stays referentially valid.
CREATE TABLE IF NOT EXISTS teams (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    leader     TEXT NOT NULL,
    deleted_at TEXT                          -- RFC 3339 UTC or NULL
);

-- Strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS location_visits (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location_id INTEGER NOT NULL REFERENCES locations(id),
    team_id     INTEGER NOT NULL REFERENCES teams(id),
    visit_date  TEXT    NOT NULL,            -- RFC 3339 UTC, fixed width
    is_preached INTEGER NOT NULL DEFAULT 0,
    notes       TEXT    NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS planned_visits (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    location_id  INTEGER NOT NULL REFERENCES locations(id),
    team_id      INTEGER NOT NULL REFERENCES teams(id),
    planned_date TEXT    NOT NULL,           -- YYYY-MM-DD
    created_at   TEXT    NOT NULL,
    UNIQUE (location_id, planned_date)
);

CREATE TABLE IF NOT EXISTS team_assignments (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    team_id        INTEGER NOT NULL REFERENCES teams(id),
    location_id    INTEGER NOT NULL REFERENCES locations(id),
    is_completed   INTEGER NOT NULL DEFAULT 0,
    assigned_date  TEXT    NOT NULL,
    completed_date TEXT,
    UNIQUE (team_id, location_id)
);

CREATE INDEX IF NOT EXISTS visits_location_idx ON location_visits(location_id);
CREATE INDEX IF NOT EXISTS visits_date_idx     ON location_visits(visit_date);
CREATE INDEX IF NOT EXISTS planned_team_idx    ON planned_visits(team_id);
";
