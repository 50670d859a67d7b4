//! Error type for `bible-etl`.

use std::{error::Error as StdError, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {}", path.display())]
  Read {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("failed to write {}", path.display())]
  Write {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("failed to parse {}", path.display())]
  Parse {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("failed to list {}", path.display())]
  Walk {
    path:   PathBuf,
    source: walkdir::Error,
  },

  #[error("language directory {} does not exist", .0.display())]
  MissingLanguageDir(PathBuf),

  #[error("verse not found: {0}")]
  VerseNotFound(String),

  #[error(transparent)]
  Core(#[from] bible_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
