//! Handlers for a team's planned visits and assignments.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/teams/{id}/plan` | Body: `{"location_ids":[1,2],"date":"2025-03-09"}`; 409 on a taken slot |
//! | `GET`  | `/teams/{id}/planned` | Today and later only |
//! | `GET`  | `/teams/{id}/assignments` | Incomplete first |
//! | `POST` | `/teams/{id}/assignments` | Body: `{"location_ids":[1,2]}`; safe to retry |
//! | `PUT`  | `/teams/{id}/assignments/{assignment_id}` | Body: `{"is_completed":true}` |

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;
use tracker_core::{
  lifecycle::{Assignment, PlannedVisit},
  store::TrackerStore,
};

use crate::{
  ack::Ack,
  error::{ApiError, store_err},
  extract::{ApiJson, ApiPath},
};

// ─── Planning ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlanBody {
  pub location_ids: Vec<i64>,
  pub date:         NaiveDate,
}

/// `POST /teams/{id}/plan`
pub async fn plan<S>(
  State(store): State<Arc<S>>,
  ApiPath(team_id): ApiPath<i64>,
  ApiJson(body): ApiJson<PlanBody>,
) -> Result<Json<Ack>, ApiError>
where
  S: TrackerStore,
{
  let planned = store
    .plan_visits(team_id, body.location_ids, body.date)
    .await
    .map_err(store_err)?;
  Ok(Json(Ack::new("visits planned", planned)))
}

/// `GET /teams/{id}/planned`
pub async fn planned<S>(
  State(store): State<Arc<S>>,
  ApiPath(team_id): ApiPath<i64>,
) -> Result<Json<Vec<PlannedVisit>>, ApiError>
where
  S: TrackerStore,
{
  let plans = store.planned_visits(team_id, None).await.map_err(store_err)?;
  Ok(Json(plans))
}

// ─── Assignments ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub location_ids: Vec<i64>,
}

/// `GET /teams/{id}/assignments`
pub async fn assignments<S>(
  State(store): State<Arc<S>>,
  ApiPath(team_id): ApiPath<i64>,
) -> Result<Json<Vec<Assignment>>, ApiError>
where
  S: TrackerStore,
{
  let assignments = store.team_assignments(team_id).await.map_err(store_err)?;
  Ok(Json(assignments))
}

/// `POST /teams/{id}/assignments`
pub async fn assign<S>(
  State(store): State<Arc<S>>,
  ApiPath(team_id): ApiPath<i64>,
  ApiJson(body): ApiJson<AssignBody>,
) -> Result<Json<Ack>, ApiError>
where
  S: TrackerStore,
{
  let inserted = store
    .assign_locations(team_id, body.location_ids)
    .await
    .map_err(store_err)?;
  Ok(Json(Ack::new("locations assigned", inserted)))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub is_completed: bool,
}

/// `PUT /teams/{id}/assignments/{assignment_id}`
///
/// An assignment id that does not belong to the team is not an error: the
/// request succeeds with `"updated": false` and nothing changes.
pub async fn update_status<S>(
  State(store): State<Arc<S>>,
  ApiPath((team_id, assignment_id)): ApiPath<(i64, i64)>,
  ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Ack>, ApiError>
where
  S: TrackerStore,
{
  let updated = store
    .update_assignment_status(team_id, assignment_id, body.is_completed)
    .await
    .map_err(store_err)?;
  Ok(Json(Ack {
    updated: Some(updated),
    ..Ack::new("assignment updated", usize::from(updated))
  }))
}
