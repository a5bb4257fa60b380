//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision and a `Z` suffix, so lexical order in SQL equals chronological
//! order. Calendar dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, Datelike as _, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use tracker_core::{
  lifecycle::{Assignment, PlannedVisit},
  location::{Location, LocationStatus},
  team::Team,
  visit::{Visit, VisitRecord},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Truncate to the precision the store keeps, so values handed back to
/// callers compare equal to what a later read returns.
pub fn stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

/// Years with exactly four unsigned digits; anything else would break the
/// fixed-width text ordering.
pub fn check_encodable(dt: DateTime<Utc>) -> std::result::Result<(), tracker_core::Error> {
  if (0..=9999).contains(&dt.year()) {
    Ok(())
  } else {
    Err(tracker_core::Error::InvalidInput(format!(
      "timestamp {dt} is outside years 0000-9999"
    )))
  }
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`row_to_location`].
pub const LOCATION_COLUMNS: &str = "id, name, latitude, longitude, is_preached";

pub fn row_to_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<Location> {
  Ok(Location {
    id:          row.get(0)?,
    name:        row.get(1)?,
    latitude:    row.get(2)?,
    longitude:   row.get(3)?,
    is_preached: row.get(4)?,
  })
}

pub fn row_to_team(row: &rusqlite::Row<'_>) -> rusqlite::Result<Team> {
  Ok(Team {
    id:     row.get(0)?,
    name:   row.get(1)?,
    leader: row.get(2)?,
  })
}

/// Raw values read from a `location_visits` row.
pub struct RawVisit {
  pub id:          i64,
  pub location_id: i64,
  pub team_id:     i64,
  pub visit_date:  String,
  pub is_preached: bool,
  pub notes:       String,
}

impl RawVisit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      location_id: row.get(1)?,
      team_id:     row.get(2)?,
      visit_date:  row.get(3)?,
      is_preached: row.get(4)?,
      notes:       row.get(5)?,
    })
  }

  pub fn into_visit(self) -> Result<Visit> {
    Ok(Visit {
      id:          self.id,
      location_id: self.location_id,
      team_id:     self.team_id,
      visit_date:  decode_dt(&self.visit_date)?,
      is_preached: self.is_preached,
      notes:       self.notes,
    })
  }
}

/// Raw values read from a visit joined with team and location names.
pub struct RawVisitRecord {
  pub id:            i64,
  pub visit_date:    String,
  pub team_id:       i64,
  pub team_name:     String,
  pub location_id:   i64,
  pub location_name: String,
  pub is_preached:   bool,
  pub notes:         String,
}

impl RawVisitRecord {
  pub fn into_record(self) -> Result<VisitRecord> {
    Ok(VisitRecord {
      id:            self.id,
      visit_date:    decode_dt(&self.visit_date)?,
      team_id:       self.team_id,
      team_name:     self.team_name,
      location_id:   self.location_id,
      location_name: self.location_name,
      is_preached:   self.is_preached,
      notes:         self.notes,
    })
  }
}

/// Raw values read from a location left-joined with its visits.
pub struct RawLocationStatus {
  pub id:          i64,
  pub name:        String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub is_preached: bool,
  pub last_visit:  Option<String>,
  pub visit_count: i64,
}

impl RawLocationStatus {
  pub fn into_status(self) -> Result<LocationStatus> {
    Ok(LocationStatus {
      id:          self.id,
      name:        self.name,
      latitude:    self.latitude,
      longitude:   self.longitude,
      is_preached: self.is_preached,
      last_visit:  self.last_visit.as_deref().map(decode_dt).transpose()?,
      visit_count: count(self.visit_count),
    })
  }
}

/// Raw values read from a `planned_visits` row joined with its location.
pub struct RawPlannedVisit {
  pub id:            i64,
  pub location_id:   i64,
  pub location_name: String,
  pub team_id:       i64,
  pub planned_date:  String,
}

impl RawPlannedVisit {
  pub fn into_planned(self) -> Result<PlannedVisit> {
    Ok(PlannedVisit {
      id:            self.id,
      location_id:   self.location_id,
      location_name: self.location_name,
      team_id:       self.team_id,
      planned_date:  decode_date(&self.planned_date)?,
    })
  }
}

/// Raw values read from a `team_assignments` row joined with its location.
pub struct RawAssignment {
  pub id:             i64,
  pub team_id:        i64,
  pub location_id:    i64,
  pub location_name:  String,
  pub is_completed:   bool,
  pub assigned_date:  String,
  pub completed_date: Option<String>,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      id:             self.id,
      team_id:        self.team_id,
      location_id:    self.location_id,
      location_name:  self.location_name,
      is_completed:   self.is_completed,
      assigned_date:  decode_dt(&self.assigned_date)?,
      completed_date: self.completed_date.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// SQLite `COUNT(*)` is a signed 64-bit integer that is never negative.
pub fn count(n: i64) -> u64 { u64::try_from(n).unwrap_or_default() }
