//! KML placemark reader for the team tracker.
//!
//! Turns a KML document into [`NewLocation`] records ready for
//! [`TrackerStore::import_locations`](tracker_core::store::TrackerStore::import_locations).
//! Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let kml = std::fs::read("fields.kml").unwrap();
//! let parsed = tracker_kml::parse(&kml).unwrap();
//! println!("{} locations, {} skipped", parsed.locations.len(), parsed.skipped.len());
//! ```

pub mod error;
mod parse;

pub use error::{Error, Result};
use tracker_core::location::NewLocation;

// ─── Public types ────────────────────────────────────────────────────────────

/// A placemark that could not be turned into a location.
#[derive(Debug, PartialEq)]
pub struct SkippedPlacemark {
  /// The placemark's name, possibly empty.
  pub name:   String,
  pub reason: Error,
}

/// The result of reading a whole document.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedKml {
  /// One entry per usable placemark, in document order.
  pub locations: Vec<NewLocation>,
  /// Placemarks dropped individually; they never abort the rest.
  pub skipped:   Vec<SkippedPlacemark>,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Read every placemark in `input`, wherever it sits (document level or
/// nested in folders).
///
/// - A `Point` contributes its coordinate.
/// - A `Polygon` contributes the first coordinate of its outer boundary as a
///   representative point (not a centroid).
/// - KML writes `longitude,latitude[,altitude]`; the result is swapped into
///   latitude/longitude.
///
/// Only a document that is not well-formed XML is an error; unnamed or
/// malformed placemarks end up in [`ParsedKml::skipped`].
pub fn parse(input: &[u8]) -> Result<ParsedKml> { parse::parse_document(input) }
