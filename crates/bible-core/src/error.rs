//! Error types for `bible-core`.

use thiserror::Error;

use crate::validate::Issue;

#[derive(Debug, Error)]
pub enum Error {
  /// The document does not have the `{language, version, books[]}` shape.
  #[error("invalid Bible data format: {0}")]
  InvalidDocument(String),

  #[error("document failed validation with {} issue(s)", .0.len())]
  Validation(Vec<Issue>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("invalid catalog: {0}")]
  Catalog(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
