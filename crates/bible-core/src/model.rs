//! Stored entities.
//!
//! Every entity is identified by a store-assigned integer id and addressed
//! from the outside by a natural key (language code, version code, book slug,
//! `(book, chapter number)`, `(version, chapter, verse number)`).

use serde::{Deserialize, Serialize};

/// A human language, e.g. `en` / English.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
  pub id:   i64,
  pub code: String,
  pub name: String,
}

/// A named translation or edition of the text, scoped to one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
  pub id:          i64,
  pub code:        String,
  pub name:        String,
  pub language_id: i64,
}

/// A book of the Bible. Book structure is shared across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  pub id:     i64,
  pub slug:   String,
  pub name:   String,
  /// Canonical ordering position.
  pub number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
  pub id:          i64,
  pub book_id:     i64,
  pub chapter_num: i64,
}

/// One verse of one chapter in one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
  pub id:           i64,
  pub chapter_id:   i64,
  pub version_id:   i64,
  pub verse_number: i64,
  pub text:         String,
}

/// An audio rendition attached to a verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audio {
  pub id:       i64,
  pub verse_id: i64,
  pub language: String,
  pub url:      String,
  /// Length in seconds.
  pub duration: Option<f64>,
  pub format:   Option<String>,
}

/// The mutable fields of an [`Audio`] row, used for inserts and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAudio {
  pub language: String,
  pub url:      String,
  pub duration: Option<f64>,
  pub format:   Option<String>,
}
