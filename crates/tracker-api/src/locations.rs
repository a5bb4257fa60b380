//! Handlers for `/locations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/locations` | Ordered by id |
//! | `GET`  | `/locations/available` | Not yet preached, ordered by name |
//! | `GET`  | `/locations/status` | Derived `last_visit` / `visit_count` |
//! | `GET`  | `/locations/{id}/visits` | Newest first; empty for an unknown id |

use std::sync::Arc;

use axum::{Json, extract::State};
use tracker_core::{
  location::{Location, LocationStatus},
  store::TrackerStore,
  visit::Visit,
};

use crate::{
  error::{ApiError, store_err},
  extract::ApiPath,
};

/// `GET /locations`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Location>>, ApiError>
where
  S: TrackerStore,
{
  let locations = store.list_locations().await.map_err(store_err)?;
  Ok(Json(locations))
}

/// `GET /locations/available`
pub async fn available<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Location>>, ApiError>
where
  S: TrackerStore,
{
  let locations = store.available_locations().await.map_err(store_err)?;
  Ok(Json(locations))
}

/// `GET /locations/status`
pub async fn status<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<LocationStatus>>, ApiError>
where
  S: TrackerStore,
{
  let statuses = store.location_statuses().await.map_err(store_err)?;
  Ok(Json(statuses))
}

/// `GET /locations/{id}/visits`
pub async fn visits<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<Visit>>, ApiError>
where
  S: TrackerStore,
{
  let visits = store.location_visits(id).await.map_err(store_err)?;
  Ok(Json(visits))
}
