//! Handlers for `/teams` CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/teams` | Live teams only |
//! | `POST`   | `/teams` | Body: `{"name":"North","leader":"Kim"}`; 201 |
//! | `PUT`    | `/teams/{id}` | Same body; 404 if the team is absent |
//! | `DELETE` | `/teams/{id}` | Idempotent |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracker_core::{
  store::TrackerStore,
  team::{Team, TeamInput},
};

use crate::{
  ack::Ack,
  error::{ApiError, store_err},
  extract::{ApiJson, ApiPath},
};

#[derive(Debug, Deserialize)]
pub struct TeamBody {
  pub name:   String,
  #[serde(default)]
  pub leader: String,
}

impl From<TeamBody> for TeamInput {
  fn from(b: TeamBody) -> Self { TeamInput { name: b.name, leader: b.leader } }
}

/// `GET /teams`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Team>>, ApiError>
where
  S: TrackerStore,
{
  let teams = store.list_teams().await.map_err(store_err)?;
  Ok(Json(teams))
}

/// `POST /teams`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<TeamBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let team = store.add_team(body.into()).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(team)))
}

/// `PUT /teams/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(body): ApiJson<TeamBody>,
) -> Result<Json<Team>, ApiError>
where
  S: TrackerStore,
{
  let team = store.update_team(id, body.into()).await.map_err(store_err)?;
  Ok(Json(team))
}

/// `DELETE /teams/{id}`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Ack>, ApiError>
where
  S: TrackerStore,
{
  let deleted = store.delete_team(id).await.map_err(store_err)?;
  Ok(Json(Ack::new("team deleted", usize::from(deleted))))
}
