//! HTTP server assembly for the team tracker.
//!
//! Wires the JSON API from `tracker-api` under `/api`, adds CORS for the one
//! configured browser origin, and traces every request. Startup helpers for
//! the fresh-database reset and the one-shot placemark import live in
//! [`bootstrap`].

pub mod bootstrap;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, InvalidHeaderValue, ORIGIN},
  },
};
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};
use tracker_core::store::TrackerStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration: built-in defaults, then `config.toml`, then
/// `TRACKER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Deleted and recreated on every start.
  pub store_path:     PathBuf,
  /// Placemark document imported once at startup.
  pub kml_path:       PathBuf,
  /// The single browser origin allowed to call the API.
  pub allowed_origin: String,
}

impl ServerConfig {
  /// Layer the optional file at `path` and the environment over the
  /// defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "team_tracker.db")?
      .set_default("kml_path", "Hampton Roads Lost Sheep Fields.kml")?
      .set_default("allowed_origin", "http://localhost:3000")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TRACKER"))
      .build()?
      .try_deserialize()
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// CORS policy for `origin`, with credentials. Requests from any other
/// origin get no CORS headers at all.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list([HeaderValue::from_str(origin)?]))
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
      ])
      .allow_headers([ORIGIN, CONTENT_LENGTH, CONTENT_TYPE, AUTHORIZATION])
      .allow_credentials(true),
  )
}

/// Build the full application router: the API nested under `/api`.
pub fn router<S>(store: Arc<S>, cors: CorsLayer) -> Router
where
  S: TrackerStore + 'static,
{
  Router::new()
    .nest("/api", tracker_api::api_router(store))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt as _;
  use tracker_store_sqlite::SqliteStore;

  use super::*;

  const ORIGIN_URL: &str = "http://localhost:3000";

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store), cors_layer(ORIGIN_URL).unwrap())
  }

  #[tokio::test]
  async fn preflight_allows_the_configured_origin_with_credentials() {
    let req = Request::builder()
      .method(Method::OPTIONS)
      .uri("/api/teams")
      .header(header::ORIGIN, ORIGIN_URL)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
      .body(Body::empty())
      .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN_URL);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("DELETE") && methods.contains("PATCH"), "{methods}");
  }

  #[tokio::test]
  async fn other_origins_get_no_cors_headers() {
    let req = Request::builder()
      .uri("/api/statistics")
      .header(header::ORIGIN, "http://evil.example")
      .body(Body::empty())
      .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let app = app().await;
    let ok = Request::builder().uri("/api/locations").body(Body::empty()).unwrap();
    let missing = Request::builder().uri("/locations").body(Body::empty()).unwrap();

    assert_eq!(app.clone().oneshot(ok).await.unwrap().status(), StatusCode::OK);
    assert_eq!(app.oneshot(missing).await.unwrap().status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn config_defaults_apply_without_a_file() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.allowed_origin, "http://localhost:3000");
    assert_eq!(cfg.kml_path, PathBuf::from("Hampton Roads Lost Sheep Fields.kml"));
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.toml");
    std::fs::write(&path, "port = 9090\nstore_path = \"/tmp/t.db\"\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/t.db"));
    assert_eq!(cfg.host, "127.0.0.1");
  }
}
