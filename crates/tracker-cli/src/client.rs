//! Async HTTP client wrapping the tracker JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracker_core::{
  lifecycle::{Assignment, PlannedVisit},
  location::{Location, LocationStatus},
  stats::Statistics,
  team::{Team, TeamInput},
  visit::{NewVisit, Visit, VisitRecord},
};

/// Acknowledgement returned by writes that do not echo a record.
#[derive(Debug, Deserialize)]
pub struct Ack {
  pub message:  String,
  pub affected: usize,
  #[serde(default)]
  pub updated:  Option<bool>,
}

/// Async HTTP client for the tracker JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: String) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn decode<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_owned))
        .unwrap_or_default();
      return Err(anyhow!("{what} → {status} {message}"));
    }
    resp.json().await.with_context(|| format!("deserialising {what} response"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let what = format!("GET {path}");
    let resp = self
      .client
      .get(self.url(path))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::decode(&what, resp).await
  }

  async fn send_json<T: DeserializeOwned>(
    &self,
    method: reqwest::Method,
    path: &str,
    body: &serde_json::Value,
  ) -> Result<T> {
    let what = format!("{method} {path}");
    let resp = self
      .client
      .request(method, self.url(path))
      .json(body)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::decode(&what, resp).await
  }

  // ── Locations ─────────────────────────────────────────────────────────────

  /// `GET /api/locations` or `GET /api/locations/available`
  pub async fn locations(&self, available_only: bool) -> Result<Vec<Location>> {
    if available_only {
      self.get("/locations/available").await
    } else {
      self.get("/locations").await
    }
  }

  /// `GET /api/locations/status`
  pub async fn location_statuses(&self) -> Result<Vec<LocationStatus>> {
    self.get("/locations/status").await
  }

  /// `GET /api/locations/{id}/visits`
  pub async fn location_visits(&self, location_id: i64) -> Result<Vec<Visit>> {
    self.get(&format!("/locations/{location_id}/visits")).await
  }

  // ── Visits ────────────────────────────────────────────────────────────────

  /// `POST /api/visits`
  pub async fn record_visit(&self, visit: &NewVisit) -> Result<Visit> {
    let body = serde_json::to_value(visit).context("serialising visit")?;
    self.send_json(reqwest::Method::POST, "/visits", &body).await
  }

  /// `GET /api/visits/history`
  pub async fn visit_history(&self) -> Result<Vec<VisitRecord>> {
    self.get("/visits/history").await
  }

  // ── Teams ─────────────────────────────────────────────────────────────────

  /// `GET /api/teams`
  pub async fn teams(&self) -> Result<Vec<Team>> { self.get("/teams").await }

  /// `POST /api/teams`
  pub async fn add_team(&self, input: &TeamInput) -> Result<Team> {
    let body = json!({ "name": input.name, "leader": input.leader });
    self.send_json(reqwest::Method::POST, "/teams", &body).await
  }

  /// `PUT /api/teams/{id}`
  pub async fn update_team(&self, id: i64, input: &TeamInput) -> Result<Team> {
    let body = json!({ "name": input.name, "leader": input.leader });
    self
      .send_json(reqwest::Method::PUT, &format!("/teams/{id}"), &body)
      .await
  }

  /// `DELETE /api/teams/{id}`
  pub async fn delete_team(&self, id: i64) -> Result<Ack> {
    let what = format!("DELETE /teams/{id}");
    let resp = self
      .client
      .delete(self.url(&format!("/teams/{id}")))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::decode(&what, resp).await
  }

  // ── Planning and assignments ──────────────────────────────────────────────

  /// `POST /api/teams/{id}/plan`
  pub async fn plan(&self, team_id: i64, location_ids: &[i64], date: NaiveDate) -> Result<Ack> {
    let body = json!({ "location_ids": location_ids, "date": date });
    self
      .send_json(reqwest::Method::POST, &format!("/teams/{team_id}/plan"), &body)
      .await
  }

  /// `GET /api/teams/{id}/planned`
  pub async fn planned(&self, team_id: i64) -> Result<Vec<PlannedVisit>> {
    self.get(&format!("/teams/{team_id}/planned")).await
  }

  /// `POST /api/teams/{id}/assignments`
  pub async fn assign(&self, team_id: i64, location_ids: &[i64]) -> Result<Ack> {
    let body = json!({ "location_ids": location_ids });
    self
      .send_json(reqwest::Method::POST, &format!("/teams/{team_id}/assignments"), &body)
      .await
  }

  /// `GET /api/teams/{id}/assignments`
  pub async fn assignments(&self, team_id: i64) -> Result<Vec<Assignment>> {
    self.get(&format!("/teams/{team_id}/assignments")).await
  }

  /// `PUT /api/teams/{id}/assignments/{assignment_id}`
  pub async fn set_completed(
    &self,
    team_id: i64,
    assignment_id: i64,
    is_completed: bool,
  ) -> Result<Ack> {
    let body = json!({ "is_completed": is_completed });
    self
      .send_json(
        reqwest::Method::PUT,
        &format!("/teams/{team_id}/assignments/{assignment_id}"),
        &body,
      )
      .await
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  /// `GET /api/statistics`
  pub async fn statistics(&self) -> Result<Statistics> { self.get("/statistics").await }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_base_and_api_prefix() {
    let client = ApiClient::new("http://localhost:8080/".into()).unwrap();
    assert_eq!(client.url("/teams"), "http://localhost:8080/api/teams");
  }

  #[test]
  fn ack_without_updated_flag_parses() {
    let ack: Ack = serde_json::from_str(r#"{"message":"locations assigned","affected":2}"#).unwrap();
    assert_eq!(ack.affected, 2);
    assert_eq!(ack.updated, None);
  }
}
