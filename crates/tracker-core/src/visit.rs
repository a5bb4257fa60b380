//! Visits: the append-only record of work a team actually performed.
//!
//! A visit is never updated or deleted. It is the sole source of truth for
//! "what happened"; every status flag elsewhere is derived from, or a cached
//! copy of, this event stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
  pub id:          i64,
  pub location_id: i64,
  pub team_id:     i64,
  pub visit_date:  DateTime<Utc>,
  pub is_preached: bool,
  pub notes:       String,
}

/// Input to [`crate::store::TrackerStore::record_visit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVisit {
  pub location_id: i64,
  pub team_id:     i64,
  /// When the visit happened. The store assigns "now" when absent.
  #[serde(default)]
  pub visit_date:  Option<DateTime<Utc>>,
  #[serde(default)]
  pub is_preached: bool,
  #[serde(default)]
  pub notes:       String,
}

impl NewVisit {
  /// Convenience constructor: a visit happening now, without notes.
  pub fn new(location_id: i64, team_id: i64, is_preached: bool) -> Self {
    Self {
      location_id,
      team_id,
      visit_date: None,
      is_preached,
      notes: String::new(),
    }
  }
}

/// A visit joined with the names of its team and location, for history
/// listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
  pub id:            i64,
  pub visit_date:    DateTime<Utc>,
  pub team_id:       i64,
  pub team_name:     String,
  pub location_id:   i64,
  pub location_name: String,
  pub is_preached:   bool,
  pub notes:         String,
}
