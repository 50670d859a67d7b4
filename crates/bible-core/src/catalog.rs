//! Display names for codes and slugs found in folder-tree data.
//!
//! A catalog is a TOML file:
//!
//! ```toml
//! [languages.ruanglat]
//! name         = "Rongmei"
//! version_code = "RONGBSI"
//! version_name = "Rongmei Bible Society India"
//!
//! [books.thaureymei]
//! name   = "Genesis"
//! number = 1
//! ```
//!
//! Every lookup has a fallback, so an empty catalog is valid.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
  #[serde(default)]
  pub languages: BTreeMap<String, LanguageEntry>,
  #[serde(default)]
  pub books:     BTreeMap<String, BookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageEntry {
  pub name:         Option<String>,
  pub version_code: Option<String>,
  pub version_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookEntry {
  pub name:   String,
  pub number: i64,
}

/// Version code and name a language's folder data is loaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNames {
  pub code: String,
  pub name: String,
}

impl Catalog {
  pub fn from_toml_str(raw: &str) -> Result<Self> {
    Ok(toml::from_str(raw)?)
  }

  /// Falls back to the code itself.
  pub fn language_name(&self, code: &str) -> String {
    self
      .languages
      .get(code)
      .and_then(|l| l.name.clone())
      .unwrap_or_else(|| code.to_owned())
  }

  /// Falls back to the upper-cased code, named after the language code.
  pub fn version_for(&self, language_code: &str) -> VersionNames {
    let entry = self.languages.get(language_code);
    VersionNames {
      code: entry
        .and_then(|l| l.version_code.clone())
        .unwrap_or_else(|| language_code.to_uppercase()),
      name: entry
        .and_then(|l| l.version_name.clone())
        .unwrap_or_else(|| language_code.to_owned()),
    }
  }

  pub fn book(&self, slug: &str) -> Option<&BookEntry> {
    self.books.get(slug)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookups_use_entries() {
    let catalog = Catalog::from_toml_str(
      r#"
      [languages.ruanglat]
      name = "Rongmei"
      version_code = "RONGBSI"
      version_name = "Rongmei Bible Society India"

      [books.thaureymei]
      name = "Genesis"
      number = 1
      "#,
    )
    .unwrap();

    assert_eq!(catalog.language_name("ruanglat"), "Rongmei");
    assert_eq!(catalog.version_for("ruanglat"), VersionNames {
      code: "RONGBSI".into(),
      name: "Rongmei Bible Society India".into(),
    });
    assert_eq!(catalog.book("thaureymei").map(|b| b.number), Some(1));
  }

  #[test]
  fn empty_catalog_falls_back() {
    let catalog = Catalog::default();
    assert_eq!(catalog.language_name("kjv"), "kjv");
    assert_eq!(catalog.version_for("kjv"), VersionNames {
      code: "KJV".into(),
      name: "kjv".into(),
    });
    assert!(catalog.book("genesis").is_none());
  }

  #[test]
  fn partial_language_entry() {
    let catalog = Catalog::from_toml_str("[languages.en]\nname = \"English\"\n").unwrap();
    assert_eq!(catalog.language_name("en"), "English");
    assert_eq!(catalog.version_for("en").code, "EN");
  }

  #[test]
  fn malformed_catalog_is_an_error() {
    let err = Catalog::from_toml_str("[books.genesis]\nname = 1\n").unwrap_err();
    assert!(matches!(err, crate::Error::Catalog(_)));
  }
}
