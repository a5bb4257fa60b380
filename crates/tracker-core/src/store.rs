//! The `TrackerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tracker-store-sqlite`).
//! Higher layers (`tracker-api`, `tracker-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  lifecycle::{Assignment, PlannedVisit},
  location::{Location, LocationStatus, NewLocation},
  stats::Statistics,
  team::{Team, TeamInput},
  visit::{NewVisit, Visit, VisitRecord},
};

/// Abstraction over a tracker backend.
///
/// Every write that touches more than one row (a visit plus its location
/// flag, a batch of plans, a batch of assignments, an import) is applied as a
/// single all-or-nothing unit.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TrackerStore: Send + Sync {
  /// Backend error; must be classifiable into the shared taxonomy so the API
  /// layer can pick a status code.
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Locations ─────────────────────────────────────────────────────────

  /// Bulk-insert imported locations in one transaction. Returns the number
  /// of rows created.
  fn import_locations(
    &self,
    locations: Vec<NewLocation>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// All locations, ordered by id.
  fn list_locations(
    &self,
  ) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send + '_;

  /// Locations not yet preached, ordered by name: the candidate pool for
  /// planning and assignment.
  fn available_locations(
    &self,
  ) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send + '_;

  /// Per-location status derived from the visit history.
  fn location_statuses(
    &self,
  ) -> impl Future<Output = Result<Vec<LocationStatus>, Self::Error>> + Send + '_;

  // ── Visits ────────────────────────────────────────────────────────────

  /// Append a visit. When it reports preaching, the location's flag is set
  /// in the same transaction. Not idempotent: every call adds a row.
  fn record_visit(
    &self,
    input: NewVisit,
  ) -> impl Future<Output = Result<Visit, Self::Error>> + Send + '_;

  /// Visits to one location, newest first.
  fn location_visits(
    &self,
    location_id: i64,
  ) -> impl Future<Output = Result<Vec<Visit>, Self::Error>> + Send + '_;

  /// Every visit joined with team and location names, newest first.
  fn visit_history(
    &self,
  ) -> impl Future<Output = Result<Vec<VisitRecord>, Self::Error>> + Send + '_;

  // ── Teams ─────────────────────────────────────────────────────────────

  /// Teams that have not been deleted.
  fn list_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  fn add_team(
    &self,
    input: TeamInput,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  /// Rename a team or change its leader.
  fn update_team(
    &self,
    id: i64,
    input: TeamInput,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  /// Soft-delete a team. Its visits, plans and assignments are kept.
  /// Returns `false` if there was no live team with this id.
  fn delete_team(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Planning ──────────────────────────────────────────────────────────

  /// Plan visits to every location in `location_ids` on `date`. A single
  /// collision or unknown id rolls back the whole batch. Returns the number
  /// of plans created.
  fn plan_visits(
    &self,
    team_id: i64,
    location_ids: Vec<i64>,
    date: NaiveDate,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Plans for a team dated on or after `as_of` (defaults to today, UTC),
  /// ordered by date then location name.
  fn planned_visits(
    &self,
    team_id: i64,
    as_of: Option<NaiveDate>,
  ) -> impl Future<Output = Result<Vec<PlannedVisit>, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Assign locations to a team. Pairs that already exist are skipped, so
  /// the call is safe to retry. Returns the number of new assignments.
  fn assign_locations(
    &self,
    team_id: i64,
    location_ids: Vec<i64>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// A team's assignments, incomplete first, then by location name.
  fn team_assignments(
    &self,
    team_id: i64,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Mark an assignment completed or not. Scoped by both ids: a mismatch
  /// touches nothing and returns `false`.
  fn update_assignment_status(
    &self,
    team_id: i64,
    assignment_id: i64,
    is_completed: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Aggregate counters as of `as_of` (defaults to now).
  fn statistics(
    &self,
    as_of: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;
}
