//! JSON documents consumed and produced by the ETL loaders.
//!
//! Three input shapes exist:
//!
//! - [`SeedDocument`]: one composite `{language, version, books[]}` document.
//! - [`ChapterFile`]: one chapter of the folder tree
//!   `<language>/<book>/<chapter>.json`.
//! - [`AudioAttachment`]: one entry of a flat audio-attachment array.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, model::NewAudio, validate};

// ─── Composite document ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDocument {
  pub language: LanguageDoc,
  pub version:  VersionDoc,
  pub books:    Vec<BookDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDoc {
  pub code: String,
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDoc {
  pub code: String,
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDoc {
  pub name:     String,
  pub slug:     String,
  pub number:   i64,
  pub chapters: Vec<ChapterDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDoc {
  pub chapter_num: i64,
  pub verses:      Vec<VerseDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseDoc {
  pub verse_number: i64,
  pub text:         String,
  #[serde(default)]
  pub audios:       Vec<AudioDoc>,
}

/// Audio payload, shared by the composite document and attachment records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDoc {
  /// Id of an existing audio row to overwrite.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:       Option<i64>,
  pub language: String,
  pub url:      String,
  #[serde(default)]
  pub duration: Option<f64>,
  #[serde(default)]
  pub format:   Option<String>,
}

impl From<&AudioDoc> for NewAudio {
  fn from(a: &AudioDoc) -> Self {
    NewAudio {
      language: a.language.clone(),
      url:      a.url.clone(),
      duration: a.duration,
      format:   a.format.clone(),
    }
  }
}

impl SeedDocument {
  /// Check the top-level shape, run the validator, then deserialize.
  ///
  /// A missing `language`, `version` or `books` array is reported as
  /// [`Error::InvalidDocument`]; any validator issue as [`Error::Validation`].
  pub fn from_value(value: Value) -> Result<Self> {
    let shape_ok = value.get("language").is_some_and(|v| !v.is_null())
      && value.get("version").is_some_and(|v| !v.is_null())
      && value.get("books").is_some_and(Value::is_array);
    if !shape_ok {
      return Err(Error::InvalidDocument(
        "expected an object with `language`, `version` and a `books` array".into(),
      ));
    }

    let issues = validate::validate_document(&value);
    if !issues.is_empty() {
      return Err(Error::Validation(issues));
    }

    Ok(serde_json::from_value(value)?)
  }

  pub fn stats(&self) -> DocumentStats {
    let mut stats = DocumentStats { books: self.books.len(), ..Default::default() };
    for book in &self.books {
      stats.chapters += book.chapters.len();
      for chapter in &book.chapters {
        stats.verses += chapter.verses.len();
        stats.audios += chapter.verses.iter().map(|v| v.audios.len()).sum::<usize>();
      }
    }
    stats
  }
}

/// Entity totals of a [`SeedDocument`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
  pub books:    usize,
  pub chapters: usize,
  pub verses:   usize,
  pub audios:   usize,
}

// ─── Folder-tree chapter file ────────────────────────────────────────────────

/// Literal content key marking a section heading rather than a verse.
pub const HEADING_KEY: &str = "heading";

/// One `<chapter>.json` file of the folder tree.
///
/// `content` is a list of objects mapping a verse number (or `"heading"`) to
/// text. Only `content` is required; the other fields are informational.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterFile {
  #[serde(default)]
  pub book:     Option<String>,
  #[serde(default)]
  pub slug:     Option<String>,
  #[serde(default)]
  pub chapter:  Option<i64>,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub content:  Vec<serde_json::Map<String, Value>>,
}

/// A classified key/value pair from [`ChapterFile::content`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEntry {
  Heading,
  Verse { number: i64, text: String },
  Invalid { key: String, reason: &'static str },
}

impl ChapterFile {
  /// Classify every key of every content object, in file order.
  pub fn entries(&self) -> Vec<ContentEntry> {
    self
      .content
      .iter()
      .flat_map(|item| item.iter())
      .map(|(key, value)| classify(key, value))
      .collect()
  }
}

fn classify(key: &str, value: &Value) -> ContentEntry {
  if key == HEADING_KEY {
    return ContentEntry::Heading;
  }
  let Some(number) = leading_verse_number(key) else {
    return ContentEntry::Invalid { key: key.to_owned(), reason: "not a verse number" };
  };
  match value.as_str() {
    Some(text) => ContentEntry::Verse { number, text: text.to_owned() },
    None => ContentEntry::Invalid { key: key.to_owned(), reason: "verse text is not a string" },
  }
}

/// The integer prefix of `key`, so range keys such as `"2-3"` load as verse 2
/// and suffixed keys such as `"4a"` as verse 4.
fn leading_verse_number(key: &str) -> Option<i64> {
  let key = key.trim_start();
  let (sign, rest) = match key.strip_prefix(['-', '+']) {
    Some(rest) => (&key[..1], rest),
    None => ("", key),
  };
  let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
  if digits == 0 {
    return None;
  }
  format!("{sign}{}", &rest[..digits]).parse().ok()
}

// ─── Audio attachment ────────────────────────────────────────────────────────

/// One record of an attach-audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAttachment {
  pub version_code: String,
  pub book_slug:    String,
  pub chapter_num:  i64,
  pub verse_number: i64,
  pub audio:        AudioDoc,
}

impl AudioAttachment {
  /// `book chapter:verse (VERSION)`, used in progress and failure lines.
  pub fn reference(&self) -> String {
    format!(
      "{} {}:{} ({})",
      self.book_slug, self.chapter_num, self.verse_number, self.version_code
    )
  }
}
