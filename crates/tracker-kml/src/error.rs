//! Error types for the KML placemark parser.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
  /// The document itself is not well-formed XML; nothing can be imported.
  #[error("malformed KML document: {0}")]
  Xml(String),

  #[error("placemark has no name")]
  MissingName,

  #[error("placemark has neither a point nor a polygon boundary")]
  MissingGeometry,

  #[error("coordinate tuple {0:?} has fewer than two components")]
  ShortCoordinate(String),

  #[error("coordinate component {0:?} is not a finite number")]
  InvalidNumber(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
