//! Async HTTP client wrapping the Cellar JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use cellar_core::{
  filter::{Facets, FilterSpec},
  partition::Collection,
  wine::{NewConsumption, NewWine, Wine, WineOrder, WinePatch},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

/// Connection settings for the Cellar API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Cellar JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req`, turning non-2xx responses into errors carrying the API's
  /// `{"error": ...}` message.
  async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response> {
    debug!(request = what, "sending");
    let resp = req
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    match body.get("error").and_then(|e| e.as_str()) {
      Some(msg) => Err(anyhow!("{what} → {status}: {msg}")),
      None => Err(anyhow!("{what} → {status}")),
    }
  }

  async fn json<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> Result<T> {
    self
      .send(what, req)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /api/wines`
  pub async fn list_wines(&self) -> Result<Vec<Wine>> {
    self
      .json("GET /wines", self.client.get(self.url("/wines")))
      .await
  }

  /// `GET /api/wines/:id`
  pub async fn get_wine(&self, id: Uuid) -> Result<Wine> {
    self
      .json("GET /wines/:id", self.client.get(self.url(&format!("/wines/{id}"))))
      .await
  }

  /// `GET /api/collection?...`
  pub async fn collection(&self, spec: &FilterSpec, order: WineOrder) -> Result<Collection> {
    let mut query: Vec<(&str, String)> = vec![("order", order.to_string())];
    for (key, value) in [
      ("style", &spec.style),
      ("location", &spec.location),
      ("vendor", &spec.vendor),
      ("grape", &spec.grape),
    ] {
      if let Some(v) = value {
        query.push((key, v.clone()));
      }
    }

    self
      .json(
        "GET /collection",
        self.client.get(self.url("/collection")).query(&query),
      )
      .await
  }

  /// `GET /api/facets`
  pub async fn facets(&self) -> Result<Facets> {
    self
      .json("GET /facets", self.client.get(self.url("/facets")))
      .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// `POST /api/wines`
  pub async fn add_wine(&self, input: &NewWine) -> Result<Wine> {
    self
      .json("POST /wines", self.client.post(self.url("/wines")).json(input))
      .await
  }

  /// `PATCH /api/wines/:id`
  pub async fn update_wine(&self, id: Uuid, patch: &WinePatch) -> Result<Wine> {
    self
      .json(
        "PATCH /wines/:id",
        self.client.patch(self.url(&format!("/wines/{id}"))).json(patch),
      )
      .await
  }

  /// `PUT /api/wines/:id/notes`
  pub async fn update_notes(&self, id: Uuid, notes: &str) -> Result<Wine> {
    self
      .json(
        "PUT /wines/:id/notes",
        self
          .client
          .put(self.url(&format!("/wines/{id}/notes")))
          .json(&serde_json::json!({ "notes": notes })),
      )
      .await
  }

  /// `POST /api/wines/:id/consume`
  pub async fn consume(&self, id: Uuid, input: &NewConsumption) -> Result<Wine> {
    self
      .json(
        "POST /wines/:id/consume",
        self
          .client
          .post(self.url(&format!("/wines/{id}/consume")))
          .json(input),
      )
      .await
  }

  /// `DELETE /api/wines/:id`
  pub async fn delete_wine(&self, id: Uuid) -> Result<()> {
    self
      .send(
        "DELETE /wines/:id",
        self.client.delete(self.url(&format!("/wines/{id}"))),
      )
      .await?;
    Ok(())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Accept either a full UUID or a unique prefix of one.
  pub async fn resolve_id(&self, raw: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(raw) {
      return Ok(id);
    }
    let wines = self.list_wines().await?;
    match_prefix(&wines, raw)
  }
}

/// Find the single wine whose id starts with `prefix`.
pub fn match_prefix(wines: &[Wine], prefix: &str) -> Result<Uuid> {
  let prefix = prefix.to_lowercase();
  if prefix.is_empty() {
    bail!("empty wine id");
  }
  let mut hits = wines
    .iter()
    .filter(|w| w.wine_id.to_string().starts_with(&prefix));
  match (hits.next(), hits.next()) {
    (Some(w), None) => Ok(w.wine_id),
    (None, _) => Err(anyhow!("no wine matches id {prefix:?}")),
    (Some(_), Some(_)) => Err(anyhow!("id {prefix:?} is ambiguous")),
  }
}
