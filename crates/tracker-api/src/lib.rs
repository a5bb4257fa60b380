//! JSON REST API for the team tracker.
//!
//! Exposes an axum [`Router`] backed by any [`tracker_core::store::TrackerStore`].
//! CORS, tracing, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tracker_api::api_router(store.clone()))
//! ```

pub mod ack;
pub mod error;
pub mod extract;
pub mod locations;
pub mod planning;
pub mod statistics;
pub mod teams;
pub mod visits;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use tracker_core::store::TrackerStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TrackerStore + 'static,
{
  Router::new()
    // Locations
    .route("/locations", get(locations::list::<S>))
    .route("/locations/available", get(locations::available::<S>))
    .route("/locations/status", get(locations::status::<S>))
    .route("/locations/{id}/visits", get(locations::visits::<S>))
    // Visits
    .route("/visits", post(visits::record::<S>))
    .route("/visits/history", get(visits::history::<S>))
    // Teams
    .route("/teams", get(teams::list::<S>).post(teams::create::<S>))
    .route("/teams/{id}", put(teams::update::<S>).delete(teams::remove::<S>))
    // Planning and assignments
    .route("/teams/{id}/plan", post(planning::plan::<S>))
    .route("/teams/{id}/planned", get(planning::planned::<S>))
    .route(
      "/teams/{id}/assignments",
      get(planning::assignments::<S>).post(planning::assign::<S>),
    )
    .route(
      "/teams/{id}/assignments/{assignment_id}",
      put(planning::update_status::<S>),
    )
    // Statistics
    .route("/statistics", get(statistics::handler::<S>))
    .with_state(store)
}
