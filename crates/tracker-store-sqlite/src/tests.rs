//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use tracker_core::{
  Error as CoreError,
  location::NewLocation,
  store::TrackerStore,
  team::TeamInput,
  visit::NewVisit,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn loc(name: &str, latitude: f64, longitude: f64) -> NewLocation {
  NewLocation { name: name.into(), latitude, longitude }
}

fn team(name: &str) -> TeamInput {
  TeamInput { name: name.into(), leader: "Leader".into() }
}

/// A store with three locations (ids 1..=3: Charlie, Alpha, Bravo) and two
/// teams (ids 1 and 2).
async fn seeded() -> SqliteStore {
  let s = store().await;
  s.import_locations(vec![
    loc("Charlie", 36.9, -76.2),
    loc("Alpha", 36.8, -76.0),
    loc("Bravo", 37.0, -76.1),
  ])
  .await
  .unwrap();
  s.add_team(team("North")).await.unwrap();
  s.add_team(team("South")).await.unwrap();
  s
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ─── Locations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn import_creates_rows_in_order() {
  let s = store().await;
  let n = s
    .import_locations(vec![loc("Site A", 36.8, -76.0), loc("Site B", 1.0, 2.0)])
    .await
    .unwrap();
  assert_eq!(n, 2);

  let all = s.list_locations().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].name, "Site A");
  assert!((all[0].latitude - 36.8).abs() < 1e-9);
  assert!((all[0].longitude + 76.0).abs() < 1e-9);
  assert!(!all[0].is_preached);
}

#[tokio::test]
async fn available_locations_are_unpreached_and_sorted_by_name() {
  let s = seeded().await;
  s.record_visit(NewVisit::new(3, 1, true)).await.unwrap();

  let names: Vec<_> = s
    .available_locations()
    .await
    .unwrap()
    .into_iter()
    .map(|l| l.name)
    .collect();
  assert_eq!(names, ["Alpha", "Charlie"]);
}

// ─── Visits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn preached_visit_sets_location_flag() {
  let s = seeded().await;
  let visit = s.record_visit(NewVisit::new(1, 2, true)).await.unwrap();
  assert_eq!(visit.location_id, 1);
  assert!(visit.id > 0);

  let statuses = s.location_statuses().await.unwrap();
  let row = statuses.iter().find(|st| st.id == 1).unwrap();
  assert_eq!(row.visit_count, 1);
  assert!(row.is_preached);
  assert_eq!(row.last_visit, Some(visit.visit_date));

  let cached = s.list_locations().await.unwrap();
  assert!(cached.iter().find(|l| l.id == 1).unwrap().is_preached);
}

#[tokio::test]
async fn preached_flag_survives_later_unpreached_visits() {
  let s = seeded().await;
  s.record_visit(NewVisit::new(1, 1, true)).await.unwrap();
  s.record_visit(NewVisit::new(1, 2, false)).await.unwrap();
  s.record_visit(NewVisit::new(1, 1, false)).await.unwrap();

  let location = s
    .list_locations()
    .await
    .unwrap()
    .into_iter()
    .find(|l| l.id == 1)
    .unwrap();
  assert!(location.is_preached);

  let status = s
    .location_statuses()
    .await
    .unwrap()
    .into_iter()
    .find(|st| st.id == 1)
    .unwrap();
  assert!(status.is_preached, "OR over history, not the latest visit");
  assert_eq!(status.visit_count, 3);
}

#[tokio::test]
async fn unvisited_location_has_no_last_visit() {
  let s = seeded().await;
  let statuses = s.location_statuses().await.unwrap();
  assert_eq!(statuses.len(), 3);
  assert!(statuses.iter().all(|st| st.last_visit.is_none() && st.visit_count == 0));
}

#[tokio::test]
async fn visit_to_unknown_location_or_team_is_not_found() {
  let s = seeded().await;

  let err = s.record_visit(NewVisit::new(99, 1, true)).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::LocationNotFound(99))));

  let err = s.record_visit(NewVisit::new(1, 42, false)).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::TeamNotFound(42))));

  assert_eq!(s.statistics(None).await.unwrap().total_visits, 0);
}

#[tokio::test]
async fn out_of_range_visit_date_is_invalid_input() {
  let s = seeded().await;
  let mut v = NewVisit::new(1, 1, true);
  v.visit_date = Some(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap());

  let err = s.record_visit(v).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::InvalidInput(_))));
  assert_eq!(s.statistics(None).await.unwrap().total_visits, 0);
  assert!(!s.list_locations().await.unwrap()[0].is_preached);
}

#[tokio::test]
async fn failed_flag_update_rolls_back_the_visit() {
  let s = seeded().await;
  s.execute_raw(
    "CREATE TRIGGER block_flag BEFORE UPDATE ON locations
     BEGIN SELECT RAISE(ABORT, 'flag update refused'); END;",
  )
  .await
  .unwrap();

  let err = s.record_visit(NewVisit::new(2, 1, true)).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));

  assert!(s.location_visits(2).await.unwrap().is_empty());
  assert!(!s.list_locations().await.unwrap()[1].is_preached);

  // An unpreached visit does not touch the location row, so it still lands.
  s.record_visit(NewVisit::new(2, 1, false)).await.unwrap();
  assert_eq!(s.location_visits(2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn location_visits_are_newest_first() {
  let s = seeded().await;
  let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

  for (offset, notes) in [(0, "first"), (2, "third"), (1, "second")] {
    let mut v = NewVisit::new(1, 1, false);
    v.visit_date = Some(t0 + TimeDelta::hours(offset));
    v.notes = notes.into();
    s.record_visit(v).await.unwrap();
  }

  let notes: Vec<_> = s
    .location_visits(1)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.notes)
    .collect();
  assert_eq!(notes, ["third", "second", "first"]);
}

#[tokio::test]
async fn history_joins_names_and_keeps_deleted_teams() {
  let s = seeded().await;
  s.record_visit(NewVisit::new(2, 2, true)).await.unwrap();
  assert!(s.delete_team(2).await.unwrap());

  let history = s.visit_history().await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].team_name, "South");
  assert_eq!(history[0].location_name, "Alpha");
  assert!(history[0].is_preached);
}

// ─── Teams ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn team_crud() {
  let s = store().await;
  let created = s.add_team(team("East")).await.unwrap();
  assert_eq!(created.name, "East");

  let updated = s
    .update_team(created.id, TeamInput { name: "East 2".into(), leader: "Lee".into() })
    .await
    .unwrap();
  assert_eq!(updated.leader, "Lee");
  assert_eq!(s.list_teams().await.unwrap(), vec![updated]);

  assert!(s.delete_team(created.id).await.unwrap());
  assert!(s.list_teams().await.unwrap().is_empty());
  assert!(!s.delete_team(created.id).await.unwrap(), "second delete is a no-op");
}

#[tokio::test]
async fn blank_team_name_is_invalid_input() {
  let s = store().await;
  let err = s.add_team(team("  ")).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::InvalidInput(_))));
}

#[tokio::test]
async fn updating_missing_team_is_not_found() {
  let s = store().await;
  let err = s.update_team(7, team("Ghost")).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::TeamNotFound(7))));
}

#[tokio::test]
async fn deleted_team_cannot_receive_new_work() {
  let s = seeded().await;
  s.delete_team(1).await.unwrap();

  let err = s.record_visit(NewVisit::new(1, 1, false)).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::TeamNotFound(1))));
  let err = s.assign_locations(1, vec![1]).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::TeamNotFound(1))));
}

// ─── Planning ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn planned_visits_ordered_by_date_then_name() {
  let s = seeded().await;
  let today = day(2030, 1, 10);
  s.plan_visits(1, vec![1, 2], day(2030, 1, 12)).await.unwrap();
  s.plan_visits(1, vec![3], day(2030, 1, 11)).await.unwrap();

  let planned = s.planned_visits(1, Some(today)).await.unwrap();
  let got: Vec<_> = planned
    .iter()
    .map(|p| (p.planned_date, p.location_name.as_str()))
    .collect();
  assert_eq!(got, [
    (day(2030, 1, 11), "Bravo"),
    (day(2030, 1, 12), "Alpha"),
    (day(2030, 1, 12), "Charlie"),
  ]);
}

#[tokio::test]
async fn past_plans_are_filtered_not_deleted() {
  let s = seeded().await;
  s.plan_visits(1, vec![1], day(2030, 1, 9)).await.unwrap();
  s.plan_visits(1, vec![2], day(2030, 1, 10)).await.unwrap();

  let upcoming = s.planned_visits(1, Some(day(2030, 1, 10))).await.unwrap();
  assert_eq!(upcoming.len(), 1);
  assert_eq!(upcoming[0].location_id, 2);

  let earlier = s.planned_visits(1, Some(day(2030, 1, 1))).await.unwrap();
  assert_eq!(earlier.len(), 2);
}

#[tokio::test]
async fn colliding_plan_batch_commits_nothing() {
  let s = seeded().await;
  let date = day(2030, 2, 1);
  s.plan_visits(2, vec![2], date).await.unwrap();

  let err = s.plan_visits(1, vec![1, 2, 3], date).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::AlreadyPlanned { location_id: 2, .. })
  ));

  assert!(s.planned_visits(1, Some(date)).await.unwrap().is_empty());
  assert_eq!(s.planned_visits(2, Some(date)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_within_batch_is_a_collision() {
  let s = seeded().await;
  let date = day(2030, 2, 2);
  let err = s.plan_visits(1, vec![1, 1], date).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::AlreadyPlanned { .. })));
  assert!(s.planned_visits(1, Some(date)).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_location_aborts_plan_batch() {
  let s = seeded().await;
  let date = day(2030, 2, 3);
  let err = s.plan_visits(1, vec![1, 77], date).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::LocationNotFound(77))));
  assert!(s.planned_visits(1, Some(date)).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_plans_for_same_slot_admit_one() {
  let s = seeded().await;
  let date = day(2030, 2, 4);
  let (a, b) = tokio::join!(
    s.plan_visits(1, vec![3], date),
    s.plan_visits(2, vec![3], date),
  );

  let (ok, err): (Vec<_>, Vec<_>) = [a, b].into_iter().partition(|r| r.is_ok());
  assert_eq!(ok.len(), 1);
  assert!(matches!(
    err[0],
    Err(Error::Core(CoreError::AlreadyPlanned { location_id: 3, .. }))
  ));

  let planned = s.planned_visits(1, Some(date)).await.unwrap().len()
    + s.planned_visits(2, Some(date)).await.unwrap().len();
  assert_eq!(planned, 1);
}

#[tokio::test]
async fn empty_plan_is_a_no_op() {
  let s = seeded().await;
  assert_eq!(s.plan_visits(1, vec![], day(2030, 1, 1)).await.unwrap(), 0);
}

// ─── Assignments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn assigning_twice_keeps_one_row_per_pair() {
  let s = seeded().await;
  assert_eq!(s.assign_locations(1, vec![1, 2]).await.unwrap(), 2);
  assert_eq!(s.assign_locations(1, vec![1, 2, 3]).await.unwrap(), 1);

  let assignments = s.team_assignments(1).await.unwrap();
  assert_eq!(assignments.len(), 3);
}

#[tokio::test]
async fn concurrent_assignments_both_succeed_once() {
  let s = seeded().await;
  let (a, b) = tokio::join!(
    s.assign_locations(1, vec![3]),
    s.assign_locations(1, vec![3]),
  );
  assert_eq!(a.unwrap() + b.unwrap(), 1);

  let assignments = s.team_assignments(1).await.unwrap();
  assert_eq!(assignments.len(), 1);
  assert_eq!(assignments[0].location_id, 3);
}

#[tokio::test]
async fn unknown_location_aborts_assignment_batch() {
  let s = seeded().await;
  let err = s.assign_locations(1, vec![1, 99]).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::LocationNotFound(99))));
  assert!(s.team_assignments(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn assignments_list_incomplete_first_then_by_name() {
  let s = seeded().await;
  s.assign_locations(1, vec![1, 2, 3]).await.unwrap();
  let alpha = s
    .team_assignments(1)
    .await
    .unwrap()
    .into_iter()
    .find(|a| a.location_name == "Alpha")
    .unwrap();
  s.update_assignment_status(1, alpha.id, true).await.unwrap();

  let names: Vec<_> = s
    .team_assignments(1)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.location_name)
    .collect();
  assert_eq!(names, ["Bravo", "Charlie", "Alpha"]);
}

#[tokio::test]
async fn completion_toggle_sets_and_clears_date() {
  let s = seeded().await;
  s.assign_locations(1, vec![1]).await.unwrap();
  let id = s.team_assignments(1).await.unwrap()[0].id;

  assert!(s.update_assignment_status(1, id, true).await.unwrap());
  let done = s.team_assignments(1).await.unwrap().remove(0);
  assert!(done.is_completed);
  let stamped = done.completed_date.expect("completed date set");

  // Re-completing keeps the original stamp.
  assert!(s.update_assignment_status(1, id, true).await.unwrap());
  let again = s.team_assignments(1).await.unwrap().remove(0);
  assert_eq!(again.completed_date, Some(stamped));

  assert!(s.update_assignment_status(1, id, false).await.unwrap());
  let undone = s.team_assignments(1).await.unwrap().remove(0);
  assert!(!undone.is_completed);
  assert_eq!(undone.completed_date, None);
}

#[tokio::test]
async fn completion_update_for_other_team_is_a_no_op() {
  let s = seeded().await;
  s.assign_locations(1, vec![1]).await.unwrap();
  let id = s.team_assignments(1).await.unwrap()[0].id;

  assert!(!s.update_assignment_status(2, id, true).await.unwrap());
  let untouched = s.team_assignments(1).await.unwrap().remove(0);
  assert!(!untouched.is_completed);
  assert_eq!(untouched.completed_date, None);
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn statistics_on_empty_store() {
  let s = store().await;
  let stats = s.statistics(None).await.unwrap();
  assert_eq!(stats, Default::default());
}

#[tokio::test]
async fn statistics_count_from_events() {
  let s = seeded().await;
  let now = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();

  let at = |hours_ago: i64| {
    let mut v = NewVisit::new(1, 1, false);
    v.visit_date = Some(now - TimeDelta::hours(hours_ago));
    v
  };

  // Team 1: inside the window. Team 2: only outside it.
  s.record_visit(NewVisit { is_preached: true, ..at(1) }).await.unwrap();
  s.record_visit(NewVisit { location_id: 2, is_preached: true, ..at(23) })
    .await
    .unwrap();
  s.record_visit(NewVisit { team_id: 2, location_id: 3, ..at(25) })
    .await
    .unwrap();
  s.record_visit(NewVisit { location_id: 1, is_preached: true, ..at(2) })
    .await
    .unwrap();

  let stats = s.statistics(Some(now)).await.unwrap();
  assert_eq!(stats.total_locations, 3);
  assert_eq!(stats.preached_locations, 2, "distinct locations only");
  assert_eq!(stats.active_teams, 1);
  assert_eq!(stats.total_visits, 4);
  assert!(stats.preached_locations <= stats.total_locations);

  // The window slides with the query time.
  let later = s.statistics(Some(now + TimeDelta::hours(24))).await.unwrap();
  assert_eq!(later.active_teams, 0);
  let earlier = s.statistics(Some(now - TimeDelta::hours(2))).await.unwrap();
  assert_eq!(earlier.active_teams, 2);
  // Visits after the query time are not counted as activity yet.
  let day_before = s.statistics(Some(now - TimeDelta::hours(24))).await.unwrap();
  assert_eq!(day_before.active_teams, 1);
}

#[tokio::test]
async fn future_dated_visit_does_not_make_a_team_active() {
  let s = seeded().await;
  let mut v = NewVisit::new(1, 2, false);
  v.visit_date = Some(Utc::now() + TimeDelta::days(30));
  s.record_visit(v).await.unwrap();

  let stats = s.statistics(None).await.unwrap();
  assert_eq!(stats.total_visits, 1);
  assert_eq!(stats.active_teams, 0);
}
