//! HTTP server assembly for the Bible API.
//!
//! Loads [`ServerConfig`] and wraps [`bible_api::api_router`] in the
//! transport layers (request tracing, CORS). The binary in `main.rs` owns the
//! store lifecycle.

pub mod error;

pub use error::Error;

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{Router, http::HeaderValue};
use bible_api::ApiOptions;
use bible_core::store::BibleStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

/// Prefix of environment variables overriding file settings,
/// e.g. `BIBLE_PORT=8080`.
pub const ENV_PREFIX: &str = "BIBLE";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Deployment mode. Only `production` hides error details.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunMode {
  #[default]
  Development,
  Production,
  Test,
}

/// Runtime server configuration, deserialised from the config file and
/// `BIBLE_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  #[serde(default)]
  pub environment: RunMode,
  /// Allowed CORS origin; absent or `*` allows any origin.
  #[serde(default)]
  pub cors_origin: Option<String>,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, and the environment.
  pub fn load(path: &Path) -> Result<Self, Error> {
    let settings = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("store_path", "bible.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn api_options(&self) -> ApiOptions {
    ApiOptions { expose_error_details: self.environment != RunMode::Production }
  }

  fn cors_layer(&self) -> Result<CorsLayer, Error> {
    let origin = match self.cors_origin.as_deref() {
      None | Some("*") => AllowOrigin::from(Any),
      Some(origin) => HeaderValue::from_str(origin)
        .map(AllowOrigin::exact)
        .map_err(|_| Error::CorsOrigin(origin.to_owned()))?,
    };
    Ok(CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any))
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the complete application router for `store`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Result<Router, Error>
where
  S: BibleStore + 'static,
{
  Ok(
    bible_api::api_router(store, config.api_options())
      .layer(config.cors_layer()?)
      .layer(TraceLayer::new_for_http()),
  )
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use bible_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  fn config(cors_origin: Option<&str>, environment: RunMode) -> ServerConfig {
    ServerConfig {
      host:        "127.0.0.1".to_string(),
      port:        3000,
      store_path:  PathBuf::from(":memory:"),
      environment,
      cors_origin: cors_origin.map(str::to_owned),
    }
  }

  #[test]
  fn load_reads_file_over_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "port = 8080\nstore_path = \"/var/lib/bible.db\"\nenvironment = \"production\""
    )
    .unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/bible.db"));
    assert_eq!(cfg.environment, RunMode::Production);
    assert!(!cfg.api_options().expose_error_details);
  }

  #[test]
  fn load_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("missing.toml")).unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:3000");
    assert_eq!(cfg.environment, RunMode::Development);
    assert!(cfg.api_options().expose_error_details);
  }

  #[test]
  fn invalid_cors_origin_is_rejected() {
    let cfg = config(Some("bad\norigin"), RunMode::Test);
    assert!(matches!(cfg.cors_layer(), Err(Error::CorsOrigin(_))));
  }

  #[tokio::test]
  async fn app_sets_cors_header() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let app = app(store, &config(Some("https://yourbible.in"), RunMode::Test)).unwrap();

    let req = Request::builder()
      .uri("/health")
      .header(header::ORIGIN, "https://yourbible.in")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "https://yourbible.in"
    );
  }
}
