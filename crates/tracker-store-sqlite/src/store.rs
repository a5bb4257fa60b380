//! [`SqliteStore`], the SQLite implementation of [`TrackerStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::params;
use tracker_core::{
  Error as CoreError,
  lifecycle::{Assignment, PlannedVisit},
  location::{Location, LocationStatus, NewLocation},
  stats::Statistics,
  store::TrackerStore,
  team::{Team, TeamInput},
  visit::{NewVisit, Visit, VisitRecord},
};

use crate::{
  Error, Result,
  encode::{
    LOCATION_COLUMNS, RawAssignment, RawLocationStatus, RawPlannedVisit,
    RawVisit, RawVisitRecord, check_encodable, encode_date, encode_dt, row_to_location,
    row_to_team, stored_precision,
  },
  lifecycle, schema::SCHEMA, stats,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tracker store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialised onto one connection thread, so each transaction observes
/// the effects of every transaction that finished before it.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
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

  /// Run arbitrary SQL against the connection; lets tests plant triggers
  /// that make a write fail midway.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_locations(&self, sql: String) -> Result<Vec<Location>> {
    let locations = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], row_to_location)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(locations)
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = Error;

  // ── Locations ─────────────────────────────────────────────────────────────

  async fn import_locations(&self, locations: Vec<NewLocation>) -> Result<usize> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO locations (name, latitude, longitude) VALUES (?1, ?2, ?3)",
          )?;
          for loc in &locations {
            inserted += stmt.execute(params![loc.name, loc.latitude, loc.longitude])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    tracing::debug!(inserted, "imported locations");
    Ok(inserted)
  }

  async fn list_locations(&self) -> Result<Vec<Location>> {
    self
      .query_locations(format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY id"))
      .await
  }

  async fn available_locations(&self) -> Result<Vec<Location>> {
    self
      .query_locations(format!(
        "SELECT {LOCATION_COLUMNS} FROM locations
         WHERE is_preached = 0
         ORDER BY name, id"
      ))
      .await
  }

  async fn location_statuses(&self) -> Result<Vec<LocationStatus>> {
    let raws: Vec<RawLocationStatus> = self
      .conn
      .call(|conn| {
        // `is_preached` is OR-ed over the whole history, not read from the
        // cached column or the latest visit.
        let mut stmt = conn.prepare(
          "SELECT
             l.id, l.name, l.latitude, l.longitude,
             COALESCE(MAX(v.is_preached), 0) AS any_preached,
             MAX(v.visit_date)               AS last_visit,
             COUNT(v.id)                     AS visit_count
           FROM locations l
           LEFT JOIN location_visits v ON v.location_id = l.id
           GROUP BY l.id
           ORDER BY l.id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLocationStatus {
              id:          row.get(0)?,
              name:        row.get(1)?,
              latitude:    row.get(2)?,
              longitude:   row.get(3)?,
              is_preached: row.get(4)?,
              last_visit:  row.get(5)?,
              visit_count: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLocationStatus::into_status).collect()
  }

  // ── Visits ────────────────────────────────────────────────────────────────

  async fn record_visit(&self, input: NewVisit) -> Result<Visit> {
    let visit_date = stored_precision(input.visit_date.unwrap_or_else(Utc::now));
    check_encodable(visit_date)?;
    let date_str = encode_dt(visit_date);

    let tx_input = input.clone();
    let id = self
      .conn
      .call(move |conn| lifecycle::record_visit(conn, &tx_input, &date_str))
      .await?;

    tracing::debug!(
      visit_id = id,
      location_id = input.location_id,
      team_id = input.team_id,
      is_preached = input.is_preached,
      "recorded visit"
    );

    Ok(Visit {
      id,
      location_id: input.location_id,
      team_id: input.team_id,
      visit_date,
      is_preached: input.is_preached,
      notes: input.notes,
    })
  }

  async fn location_visits(&self, location_id: i64) -> Result<Vec<Visit>> {
    let raws: Vec<RawVisit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, location_id, team_id, visit_date, is_preached, notes
           FROM location_visits
           WHERE location_id = ?1
           ORDER BY visit_date DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(params![location_id], RawVisit::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVisit::into_visit).collect()
  }

  async fn visit_history(&self) -> Result<Vec<VisitRecord>> {
    let raws: Vec<RawVisitRecord> = self
      .conn
      .call(|conn| {
        // Soft-deleted teams still resolve, so their history keeps a name.
        let mut stmt = conn.prepare(
          "SELECT
             v.id, v.visit_date,
             t.id, t.name,
             l.id, l.name,
             v.is_preached, v.notes
           FROM location_visits v
           JOIN teams     t ON t.id = v.team_id
           JOIN locations l ON l.id = v.location_id
           ORDER BY v.visit_date DESC, v.id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawVisitRecord {
              id:            row.get(0)?,
              visit_date:    row.get(1)?,
              team_id:       row.get(2)?,
              team_name:     row.get(3)?,
              location_id:   row.get(4)?,
              location_name: row.get(5)?,
              is_preached:   row.get(6)?,
              notes:         row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVisitRecord::into_record).collect()
  }

  // ── Teams ─────────────────────────────────────────────────────────────────

  async fn list_teams(&self) -> Result<Vec<Team>> {
    let teams = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, leader FROM teams WHERE deleted_at IS NULL ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], row_to_team)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(teams)
  }

  async fn add_team(&self, input: TeamInput) -> Result<Team> {
    input.validate()?;

    let TeamInput { name, leader } = input;
    let (row_name, row_leader) = (name.clone(), leader.clone());
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teams (name, leader) VALUES (?1, ?2)",
          params![row_name, row_leader],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::info!(team_id = id, %name, "created team");
    Ok(Team { id, name, leader })
  }

  async fn update_team(&self, id: i64, input: TeamInput) -> Result<Team> {
    input.validate()?;

    let TeamInput { name, leader } = input;
    let (row_name, row_leader) = (name.clone(), leader.clone());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE teams SET name = ?1, leader = ?2
           WHERE id = ?3 AND deleted_at IS NULL",
          params![row_name, row_leader, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(CoreError::TeamNotFound(id).into());
    }
    Ok(Team { id, name, leader })
  }

  async fn delete_team(&self, id: i64) -> Result<bool> {
    let at = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE teams SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
          params![at, id],
        )?)
      })
      .await?;

    if changed > 0 {
      tracing::info!(team_id = id, "deleted team; history retained");
    }
    Ok(changed > 0)
  }

  // ── Planning ──────────────────────────────────────────────────────────────

  async fn plan_visits(
    &self,
    team_id:      i64,
    location_ids: Vec<i64>,
    date:         NaiveDate,
  ) -> Result<usize> {
    if location_ids.is_empty() {
      return Ok(0);
    }

    let date_str   = encode_date(date);
    let created_at = encode_dt(Utc::now());
    let planned = self
      .conn
      .call(move |conn| {
        lifecycle::plan_visits(conn, team_id, &location_ids, date, &date_str, &created_at)
      })
      .await?;

    tracing::debug!(team_id, %date, planned, "planned visits");
    Ok(planned)
  }

  async fn planned_visits(
    &self,
    team_id: i64,
    as_of:   Option<NaiveDate>,
  ) -> Result<Vec<PlannedVisit>> {
    let from = encode_date(as_of.unwrap_or_else(|| Utc::now().date_naive()));

    let raws: Vec<RawPlannedVisit> = self
      .conn
      .call(move |conn| {
        // Past plans are filtered out here, never deleted.
        let mut stmt = conn.prepare(
          "SELECT pv.id, l.id, l.name, pv.team_id, pv.planned_date
           FROM planned_visits pv
           JOIN locations l ON l.id = pv.location_id
           WHERE pv.team_id = ?1
             AND pv.planned_date >= ?2
           ORDER BY pv.planned_date, l.name, pv.id",
        )?;
        let rows = stmt
          .query_map(params![team_id, from], |row| {
            Ok(RawPlannedVisit {
              id:            row.get(0)?,
              location_id:   row.get(1)?,
              location_name: row.get(2)?,
              team_id:       row.get(3)?,
              planned_date:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlannedVisit::into_planned).collect()
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn assign_locations(&self, team_id: i64, location_ids: Vec<i64>) -> Result<usize> {
    if location_ids.is_empty() {
      return Ok(0);
    }

    let assigned_at = encode_dt(Utc::now());
    let inserted = self
      .conn
      .call(move |conn| {
        lifecycle::assign_locations(conn, team_id, &location_ids, &assigned_at)
      })
      .await?;

    tracing::debug!(team_id, inserted, "assigned locations");
    Ok(inserted)
  }

  async fn team_assignments(&self, team_id: i64) -> Result<Vec<Assignment>> {
    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             ta.id, ta.team_id, ta.location_id, l.name,
             ta.is_completed, ta.assigned_date, ta.completed_date
           FROM team_assignments ta
           JOIN locations l ON l.id = ta.location_id
           WHERE ta.team_id = ?1
           ORDER BY ta.is_completed, l.name, ta.id",
        )?;
        let rows = stmt
          .query_map(params![team_id], |row| {
            Ok(RawAssignment {
              id:             row.get(0)?,
              team_id:        row.get(1)?,
              location_id:    row.get(2)?,
              location_name:  row.get(3)?,
              is_completed:   row.get(4)?,
              assigned_date:  row.get(5)?,
              completed_date: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn update_assignment_status(
    &self,
    team_id:       i64,
    assignment_id: i64,
    is_completed:  bool,
  ) -> Result<bool> {
    let now = encode_dt(Utc::now());
    let updated = self
      .conn
      .call(move |conn| {
        Ok(lifecycle::update_assignment_status(
          conn,
          team_id,
          assignment_id,
          is_completed,
          &now,
        )?)
      })
      .await?;

    if !updated {
      tracing::debug!(team_id, assignment_id, "assignment update matched no row");
    }
    Ok(updated)
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn statistics(&self, as_of: Option<DateTime<Utc>>) -> Result<Statistics> {
    let now = as_of.unwrap_or_else(Utc::now);
    let counters = self
      .conn
      .call(move |conn| Ok(stats::compute(conn, now)?))
      .await?;
    Ok(counters)
  }
}
