//! ETL loaders that write Bible JSON data into a [`BibleStore`].
//!
//! | Loader | Input |
//! |--------|-------|
//! | [`seed::seed`] | one composite `{language, version, books[]}` document |
//! | [`folder::load_folder`] | `<data>/<language>/<book>/<chapter>.json` tree |
//! | [`attach::attach_audio`] | flat array of audio attachment records |
//!
//! Loaders run sequentially. Entity-level failures are collected in a
//! [`LoadReport`] and do not stop sibling entities; malformed input files
//! are fatal before anything is written.
//!
//! [`BibleStore`]: bible_core::store::BibleStore

pub mod attach;
pub mod error;
pub mod folder;
pub mod generate;
pub mod report;
pub mod seed;

use std::path::Path;

use bible_core::catalog::Catalog;
use serde::{Serialize, de::DeserializeOwned};

pub use error::{Error, Result};
pub use report::{LoadFailure, LoadReport};

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let raw = std::fs::read_to_string(path)
    .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
  serde_json::from_str(&raw).map_err(|source| Error::Parse { path: path.to_path_buf(), source })
}

/// Write `value` as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let raw = serde_json::to_string_pretty(value)
    .map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;
  std::fs::write(path, raw).map_err(|source| Error::Write { path: path.to_path_buf(), source })
}

/// Load the name catalog at `path`; a missing file yields an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
  match std::fs::read_to_string(path) {
    Ok(raw) => Ok(Catalog::from_toml_str(&raw)?),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      tracing::info!(path = %path.display(), "no catalog file; using fallback names");
      Ok(Catalog::default())
    }
    Err(source) => Err(Error::Read { path: path.to_path_buf(), source }),
  }
}
