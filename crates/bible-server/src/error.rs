//! Startup errors for the server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
  #[error("invalid CORS origin {0:?}")]
  CorsOrigin(String),
}
