//! Aggregate counters derived from the event history.

use serde::{Deserialize, Serialize};

/// Width, in hours, of the sliding window used for
/// [`Statistics::active_teams`].
pub const ACTIVE_WINDOW_HOURS: i64 = 24;

/// Point-in-time counters. Recomputed on every request; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
  pub total_locations:    u64,
  /// Distinct locations with at least one visit reporting preaching, counted
  /// from the visits themselves rather than the cached location flag.
  pub preached_locations: u64,
  /// Distinct teams with a visit inside the trailing window ending at the
  /// query time.
  pub active_teams:       u64,
  pub total_visits:       u64,
}
