//! HTTP server wiring for Cellar.
//!
//! Mounts the JSON API from `cellar-api` under `/api`, adds request tracing
//! and a health probe, and loads [`ServerConfig`] from file and environment.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, routing::get};
use cellar_core::store::WineStore;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CELLAR_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       5233,
      store_path: PathBuf::from("cellar.db"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `CELLAR_*` environment
  /// variables. Missing keys fall back to [`ServerConfig::default`].
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CELLAR"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, ready for `TcpListener::bind`.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Health {
  status:  &'static str,
  version: &'static str,
}

async fn health() -> Json<Health> {
  Json(Health {
    status:  "ok",
    version: env!("CARGO_PKG_VERSION"),
  })
}

/// Build the top-level [`Router`]: `/health` plus the API under `/api`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: WineStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", cellar_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use cellar_core::memory::MemoryStore;
  use cellar_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[test]
  fn missing_config_file_gives_defaults() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, ServerConfig::default().port);
    assert_eq!(cfg.address(), format!("{}:{}", cfg.host, cfg.port));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else {
      return;
    };
    let cfg = ServerConfig {
      store_path: PathBuf::from("~/wine/cellar.db"),
      ..ServerConfig::default()
    };
    assert_eq!(cfg.resolved_store_path(), PathBuf::from(home).join("wine/cellar.db"));

    let cfg = ServerConfig::default();
    assert_eq!(cfg.resolved_store_path(), PathBuf::from("cellar.db"));
  }

  #[tokio::test]
  async fn health_returns_ok() {
    let app = router(Arc::new(MemoryStore::new()));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_is_nested_over_sqlite() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = router(Arc::new(store));

    let body = serde_json::json!({
      "name": "Barolo",
      "style": "Red",
      "grapes": ["Nebbiolo"],
      "location": "Cellar A",
      "vendor": "Acme Wines",
      "purchase_date": "2023-01-01",
      "price": 3
    });
    let req = Request::builder()
      .method("POST")
      .uri("/api/wines")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = Request::builder()
      .uri("/api/collection?grape=NEB")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let view: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view["active"][0]["name"], "Barolo");
    assert_eq!(view["totals"]["archived"], 0);
  }
}
