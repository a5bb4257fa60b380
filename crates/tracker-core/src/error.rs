//! Error taxonomy shared by every layer of the tracker.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A request field was missing, empty, or out of range.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("location not found: {0}")]
  LocationNotFound(i64),

  #[error("team not found: {0}")]
  TeamNotFound(i64),

  /// The (location, date) pair is already taken by another plan.
  #[error("location {location_id} is already planned for {date}")]
  AlreadyPlanned { location_id: i64, date: NaiveDate },

  /// Transaction, connection, or decoding failure inside a backend.
  #[error("storage failure: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// `true` for the variants that mean a referenced row does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::LocationNotFound(_) | Self::TeamNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
