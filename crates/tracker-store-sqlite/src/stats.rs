//! Statistics aggregator: four independent counts over current store state.

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{Connection, params};
use tracker_core::stats::{ACTIVE_WINDOW_HOURS, Statistics};

use crate::encode::{count, encode_dt};

/// Compute every counter as of `now`. Nothing is cached between calls.
pub fn compute(conn: &Connection, now: DateTime<Utc>) -> rusqlite::Result<Statistics> {
  let cutoff = encode_dt(now - TimeDelta::hours(ACTIVE_WINDOW_HOURS));
  let until = encode_dt(now);

  let total_locations: i64 =
    conn.query_row("SELECT COUNT(*) FROM locations", [], |r| r.get(0))?;

  // From the visit events, not the cached `locations.is_preached` flag.
  let preached_locations: i64 = conn.query_row(
    "SELECT COUNT(DISTINCT location_id) FROM location_visits WHERE is_preached = 1",
    [],
    |r| r.get(0),
  )?;

  // Bounded on both sides: a visit dated after `now` is not yet activity.
  let active_teams: i64 = conn.query_row(
    "SELECT COUNT(DISTINCT team_id) FROM location_visits
     WHERE visit_date >= ?1 AND visit_date <= ?2",
    params![cutoff, until],
    |r| r.get(0),
  )?;

  let total_visits: i64 =
    conn.query_row("SELECT COUNT(*) FROM location_visits", [], |r| r.get(0))?;

  Ok(Statistics {
    total_locations:    count(total_locations),
    preached_locations: count(preached_locations),
    active_teams:       count(active_teams),
    total_visits:       count(total_visits),
  })
}
