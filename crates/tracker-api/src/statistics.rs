//! Handler for `GET /statistics`.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracker_core::{stats::Statistics, store::TrackerStore};

use crate::error::{ApiError, store_err};

/// `GET /statistics`: counters as of the request time.
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Statistics>, ApiError>
where
  S: TrackerStore,
{
  let stats = store.statistics(None).await.map_err(store_err)?;
  Ok(Json(stats))
}
