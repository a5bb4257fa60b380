//! Planning and assignment records.
//!
//! Two distinct notions of "this team should go there":
//!
//! - a [`PlannedVisit`] is a dated intention, unique per (location, date). It
//!   expires implicitly: reads only return plans dated today or later, but
//!   past plans stay in the store.
//! - an [`Assignment`] is a durable responsibility pairing, unique per
//!   (team, location), with a completion flag.
//!
//! Neither is a [`Visit`](crate::visit::Visit); completing an assignment does
//! not record one, and recording a visit does not complete an assignment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A planned visit joined with its location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedVisit {
  pub id:            i64,
  pub location_id:   i64,
  pub location_name: String,
  pub team_id:       i64,
  pub planned_date:  NaiveDate,
}

/// A team↔location assignment joined with its location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:             i64,
  pub team_id:        i64,
  pub location_id:    i64,
  pub location_name:  String,
  pub is_completed:   bool,
  pub assigned_date:  DateTime<Utc>,
  /// Set when the assignment is marked completed, cleared when it is marked
  /// incomplete again.
  pub completed_date: Option<DateTime<Utc>>,
}
