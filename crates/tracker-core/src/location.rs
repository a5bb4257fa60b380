//! Locations: the geographic points teams are sent to visit.
//!
//! Locations are created once from the imported placemark file and never
//! deleted. Coordinates are immutable; only the `is_preached` flag changes,
//! and only from `false` to `true`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub id:          i64,
  pub name:        String,
  pub latitude:    f64,
  pub longitude:   f64,
  /// Cached copy of "some visit reported preaching here". Monotonic.
  pub is_preached: bool,
}

/// Input to [`crate::store::TrackerStore::import_locations`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
  pub name:      String,
  pub latitude:  f64,
  pub longitude: f64,
}

/// The derived per-location read model, never stored and always computed from
/// the visit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStatus {
  pub id:          i64,
  pub name:        String,
  pub latitude:    f64,
  pub longitude:   f64,
  /// `true` if *any* recorded visit reported preaching, not just the latest.
  pub is_preached: bool,
  /// Timestamp of the most recent visit. Serialised as `""` when there is
  /// none.
  #[serde(with = "empty_when_none")]
  pub last_visit:  Option<DateTime<Utc>>,
  pub visit_count: u64,
}

mod empty_when_none {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match value {
      Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
      None => serializer.serialize_str(""),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
      return Ok(None);
    }
    DateTime::parse_from_rfc3339(&raw)
      .map(|dt| Some(dt.with_timezone(&Utc)))
      .map_err(D::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn status(last_visit: Option<DateTime<Utc>>) -> LocationStatus {
    LocationStatus {
      id: 1,
      name: "Site A".into(),
      latitude: 36.8,
      longitude: -76.0,
      is_preached: false,
      last_visit,
      visit_count: 0,
    }
  }

  #[test]
  fn missing_last_visit_serialises_as_empty_string() {
    let json = serde_json::to_value(status(None)).unwrap();
    assert_eq!(json["last_visit"], "");

    let back: LocationStatus = serde_json::from_value(json).unwrap();
    assert_eq!(back.last_visit, None);
  }

  #[test]
  fn present_last_visit_is_rfc3339() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let json = serde_json::to_value(status(Some(at))).unwrap();
    assert_eq!(json["last_visit"], "2024-05-01T12:30:00+00:00");

    let back: LocationStatus = serde_json::from_value(json).unwrap();
    assert_eq!(back.last_visit, Some(at));
  }
}
