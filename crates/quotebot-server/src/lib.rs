//! quotebot server: configuration and application assembly.
//!
//! The binary in `main.rs` reads a [`ServerConfig`], opens the SQLite store
//! and serves the event API returned by [`app`].

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use quotebot_core::store::QuoteStore;
use quotebot_service::{QuoteService, ServiceConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Server settings, read from `config.toml` and `QUOTEBOT_*` environment
/// variables (nested keys use `__`, e.g. `QUOTEBOT_SERVICE__MAX_AMOUNT`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path:           PathBuf,
  /// How long to wait for the store to open before giving up.
  #[serde(default = "default_startup_timeout")]
  pub startup_timeout_secs: u64,
  #[serde(default)]
  pub service:              ServiceConfig,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_startup_timeout() -> u64 { 10 }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Mount the event API under `/api` with request tracing.
pub fn app<S>(service: Arc<QuoteService<S>>) -> Router
where
  S: QuoteStore + 'static,
{
  Router::new()
    .nest("/api", quotebot_api::api_router(service))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use quotebot_store_sqlite::SqliteStore;
  use tower::ServiceExt;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn config_defaults() {
    let cfg = from_toml(r#"store_path = "quotes.db""#);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.startup_timeout_secs, 10);
    assert_eq!(cfg.service.max_amount, 10);
    assert!(cfg.service.migration.is_none());
  }

  #[test]
  fn config_service_table() {
    let cfg = from_toml(
      r#"
        store_path = "quotes.db"
        port = 9000

        [service]
        max_amount = 25

        [service.migration]
        manifest_path = "old/migrate-data.json"
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.service.max_amount, 25);
    let migration = cfg.service.migration.unwrap();
    assert_eq!(migration.manifest_path, PathBuf::from("old/migrate-data.json"));
    assert_eq!(migration.quotes_path, PathBuf::from("legacy-data/quotes.json"));
  }

  #[tokio::test]
  async fn app_nests_api() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let service = Arc::new(QuoteService::new(Arc::new(store), ServiceConfig::default()));

    let req = Request::builder()
      .method("PUT")
      .uri("/api/guilds/g-alpha")
      .header("content-type", "application/json")
      .body(Body::from(r#"{"name":"Alpha"}"#))
      .unwrap();
    let resp = app(service.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder().uri("/guilds/g-alpha/quotes").body(Body::empty()).unwrap();
    let resp = app(service).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
