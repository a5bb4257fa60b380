//! Handlers for `/visits` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/visits` | Body: [`NewVisit`]; returns 201 + stored visit |
//! | `GET`  | `/visits/history` | Joined with team and location names |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracker_core::{
  store::TrackerStore,
  visit::{NewVisit, VisitRecord},
};

use crate::{
  error::{ApiError, store_err},
  extract::ApiJson,
};

/// `POST /visits`, body:
/// `{"location_id":1,"team_id":2,"is_preached":true,"notes":"..."}`.
/// `visit_date` (RFC 3339) is optional and defaults to now.
pub async fn record<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewVisit>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let visit = store.record_visit(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(visit)))
}

/// `GET /visits/history`
pub async fn history<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<VisitRecord>>, ApiError>
where
  S: TrackerStore,
{
  let records = store.visit_history().await.map_err(store_err)?;
  Ok(Json(records))
}
