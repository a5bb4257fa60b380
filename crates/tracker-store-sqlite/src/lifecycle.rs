//! The assignment / visit lifecycle rules, as synchronous units of work.
//!
//! Each public function here runs on the connection thread inside a single
//! transaction. A domain rejection ([`reject`]) or any SQL error returns
//! early, which drops the transaction uncommitted and rolls back every row
//! the batch had already written.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension as _, params};
use tracker_core::{Error as CoreError, visit::NewVisit};

use crate::error::reject;

// ─── Existence checks ────────────────────────────────────────────────────────

fn location_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM locations WHERE id = ?1", params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

/// Deleted teams count as absent for every write.
fn team_is_live(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM teams WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub fn require_location(conn: &Connection, id: i64) -> tokio_rusqlite::Result<()> {
  if location_exists(conn, id)? {
    Ok(())
  } else {
    Err(reject(CoreError::LocationNotFound(id)))
  }
}

pub fn require_team(conn: &Connection, id: i64) -> tokio_rusqlite::Result<()> {
  if team_is_live(conn, id)? {
    Ok(())
  } else {
    Err(reject(CoreError::TeamNotFound(id)))
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Visits ──────────────────────────────────────────────────────────────────

/// Append a visit and, when it reports preaching, raise the location's flag.
/// Both writes commit together or not at all. Returns the new visit id.
pub fn record_visit(
  conn: &mut Connection,
  input: &NewVisit,
  visit_date: &str,
) -> tokio_rusqlite::Result<i64> {
  let tx = conn.transaction()?;
  require_location(&tx, input.location_id)?;
  require_team(&tx, input.team_id)?;

  tx.execute(
    "INSERT INTO location_visits (location_id, team_id, visit_date, is_preached, notes)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.location_id,
      input.team_id,
      visit_date,
      input.is_preached,
      input.notes,
    ],
  )?;
  let id = tx.last_insert_rowid();

  // Monotonic: nothing on this path ever writes 0 back.
  if input.is_preached {
    tx.execute(
      "UPDATE locations SET is_preached = 1 WHERE id = ?1",
      params![input.location_id],
    )?;
  }

  tx.commit()?;
  Ok(id)
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// Insert one plan per location for `date`. Any unknown id or (location,
/// date) collision aborts the whole batch.
pub fn plan_visits(
  conn: &mut Connection,
  team_id: i64,
  location_ids: &[i64],
  date: NaiveDate,
  date_str: &str,
  created_at: &str,
) -> tokio_rusqlite::Result<usize> {
  let tx = conn.transaction()?;
  require_team(&tx, team_id)?;

  let mut planned = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO planned_visits (location_id, team_id, planned_date, created_at)
       VALUES (?1, ?2, ?3, ?4)",
    )?;
    for &location_id in location_ids {
      require_location(&tx, location_id)?;
      match stmt.execute(params![location_id, team_id, date_str, created_at]) {
        Ok(n) => planned += n,
        Err(e) if is_unique_violation(&e) => {
          return Err(reject(CoreError::AlreadyPlanned { location_id, date }));
        }
        Err(e) => return Err(e.into()),
      }
    }
  }

  tx.commit()?;
  Ok(planned)
}

// ─── Assignments ─────────────────────────────────────────────────────────────

/// Insert missing (team, location) pairs; existing pairs are skipped.
/// Returns how many pairs were new.
pub fn assign_locations(
  conn: &mut Connection,
  team_id: i64,
  location_ids: &[i64],
  assigned_at: &str,
) -> tokio_rusqlite::Result<usize> {
  let tx = conn.transaction()?;
  require_team(&tx, team_id)?;

  let mut inserted = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO team_assignments (team_id, location_id, assigned_date)
       VALUES (?1, ?2, ?3)
       ON CONFLICT (team_id, location_id) DO NOTHING",
    )?;
    for &location_id in location_ids {
      require_location(&tx, location_id)?;
      inserted += stmt.execute(params![team_id, location_id, assigned_at])?;
    }
  }

  tx.commit()?;
  Ok(inserted)
}

/// Flip an assignment's completion flag.
///
/// Completing stamps `completed_date` unless the assignment was already
/// completed, in which case the original stamp is kept. Un-completing clears
/// it. Returns `false` when no assignment with that id belongs to the team.
pub fn update_assignment_status(
  conn: &Connection,
  team_id: i64,
  assignment_id: i64,
  is_completed: bool,
  now: &str,
) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "UPDATE team_assignments
        SET completed_date = CASE
              WHEN ?1 = 0 THEN NULL
              WHEN is_completed = 1 AND completed_date IS NOT NULL THEN completed_date
              ELSE ?2
            END,
            is_completed = ?1
      WHERE id = ?3 AND team_id = ?4",
    params![is_completed, now, assignment_id, team_id],
  )?;
  Ok(changed > 0)
}
