//! Plain-text rendering of API results.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tracker_core::{
  lifecycle::{Assignment, PlannedVisit},
  location::{Location, LocationStatus},
  stats::Statistics,
  team::Team,
  visit::{Visit, VisitRecord},
};

use crate::{client::Ack, labels::Labels};

fn section<T>(title: &str, l: &Labels, items: &[T], mut line: impl FnMut(&mut String, &T)) -> String {
  let mut out = format!("{title}\n");
  if items.is_empty() {
    let _ = writeln!(out, "  {}", l.nothing);
  }
  for item in items {
    out.push_str("  ");
    line(&mut out, item);
    out.push('\n');
  }
  out
}

fn preached(l: &Labels, is_preached: bool) -> &'static str {
  if is_preached { l.preached } else { l.not_preached }
}

fn stamp(dt: &DateTime<Utc>) -> String { dt.format("%Y-%m-%d %H:%M").to_string() }

pub fn locations(l: &Labels, items: &[Location]) -> String {
  section(l.locations, l, items, |out, loc| {
    let _ = write!(
      out,
      "#{:<4} {} ({:.5}, {:.5}) [{}]",
      loc.id,
      loc.name,
      loc.latitude,
      loc.longitude,
      preached(l, loc.is_preached)
    );
  })
}

pub fn statuses(l: &Labels, items: &[LocationStatus]) -> String {
  section(l.locations, l, items, |out, s| {
    let last = s.last_visit.as_ref().map_or_else(|| l.never.to_owned(), stamp);
    let _ = write!(
      out,
      "#{:<4} {} [{}] {}: {}, {}: {}",
      s.id,
      s.name,
      preached(l, s.is_preached),
      l.visits,
      s.visit_count,
      l.last_visit,
      last
    );
  })
}

pub fn visits(l: &Labels, items: &[Visit]) -> String {
  section(l.visits, l, items, |out, v| {
    let _ = write!(
      out,
      "#{:<4} {} location {} team {} [{}]",
      v.id,
      stamp(&v.visit_date),
      v.location_id,
      v.team_id,
      preached(l, v.is_preached)
    );
    if !v.notes.is_empty() {
      let _ = write!(out, " {}", v.notes);
    }
  })
}

pub fn history(l: &Labels, items: &[VisitRecord]) -> String {
  section(l.visits, l, items, |out, v| {
    let _ = write!(
      out,
      "{} {} → {} [{}]",
      stamp(&v.visit_date),
      v.team_name,
      v.location_name,
      preached(l, v.is_preached)
    );
    if !v.notes.is_empty() {
      let _ = write!(out, " {}", v.notes);
    }
  })
}

pub fn teams(l: &Labels, items: &[Team]) -> String {
  section(l.teams, l, items, |out, t| {
    let _ = write!(out, "#{:<4} {}", t.id, t.name);
    if !t.leader.is_empty() {
      let _ = write!(out, " ({}: {})", l.leader, t.leader);
    }
  })
}

pub fn planned(l: &Labels, items: &[PlannedVisit]) -> String {
  section(l.planned, l, items, |out, p| {
    let _ = write!(out, "{} #{} {}", p.planned_date, p.location_id, p.location_name);
  })
}

pub fn assignments(l: &Labels, items: &[Assignment]) -> String {
  section(l.assignments, l, items, |out, a| {
    let state = if a.is_completed { l.completed } else { l.pending };
    let _ = write!(out, "#{:<4} {} [{}]", a.id, a.location_name, state);
    if let Some(done) = &a.completed_date {
      let _ = write!(out, " {}", stamp(done));
    }
  })
}

pub fn statistics(l: &Labels, s: &Statistics) -> String {
  format!(
    "{}: {}\n{}: {}\n{}: {}\n{}: {}\n",
    l.total_locations,
    s.total_locations,
    l.preached_locations,
    s.preached_locations,
    l.active_teams,
    s.active_teams,
    l.total_visits,
    s.total_visits
  )
}

pub fn ack(a: &Ack) -> String {
  match a.updated {
    Some(false) => format!("{} (no matching assignment)\n", a.message),
    _ => format!("{} ({})\n", a.message, a.affected),
  }
}
