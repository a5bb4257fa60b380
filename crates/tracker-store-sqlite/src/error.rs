//! Error type for `tracker-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule rejected the operation (unknown id, bad input, plan
  /// collision).
  #[error(transparent)]
  Core(#[from] tracker_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<tokio_rusqlite::Error> for Error {
  /// Domain errors raised inside a connection closure travel back boxed in
  /// `tokio_rusqlite::Error::Other`; unwrap them so callers can match on them.
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Other(inner) => {
        match inner.downcast::<tracker_core::Error>() {
          Ok(core) => Error::Core(*core),
          Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
        }
      }
      other => Error::Database(other),
    }
  }
}

impl From<Error> for tracker_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => tracker_core::Error::Storage(Box::new(other)),
    }
  }
}

/// Abort a connection closure with a domain error. Dropping the open
/// transaction on the way out rolls it back.
pub(crate) fn reject(e: tracker_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
