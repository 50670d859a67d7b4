//! Structural validation of composite seed documents.
//!
//! [`validate_document`] walks a candidate document as untyped JSON, so every
//! problem is reported instead of only the first deserialization failure.
//! Issues are structured as `(path, kind)` pairs and render to the familiar
//! human-readable form, e.g. `books[2].chapters[0]: Chapter missing chapterNum`.

use std::fmt;

use serde_json::Value;

/// The kind of entity an issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum Entity {
  Language,
  Version,
  Book,
  Chapter,
  Verse,
  Audio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
  /// A required top-level object is absent.
  MissingObject(Entity),
  /// A required scalar field is absent, null or empty.
  MissingField(Entity, &'static str),
  /// A required list is absent or not an array. `None` means top level.
  MissingArray(Option<Entity>, &'static str),
}

impl fmt::Display for IssueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IssueKind::MissingObject(entity) => {
        write!(f, "Missing {} object", entity.as_ref().to_lowercase())
      }
      IssueKind::MissingField(entity, field) => write!(f, "{entity} missing {field}"),
      IssueKind::MissingArray(None, field) => write!(f, "Missing {field} array"),
      IssueKind::MissingArray(Some(entity), field) => {
        write!(f, "{entity} missing {field} array")
      }
    }
  }
}

/// One validation failure. `path` is empty for top-level fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
  pub path: String,
  pub kind: IssueKind,
}

impl fmt::Display for Issue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.path.is_empty() {
      write!(f, "{}", self.kind)
    } else {
      write!(f, "{}: {}", self.path, self.kind)
    }
  }
}

// ─── Walk ────────────────────────────────────────────────────────────────────

/// Validate a composite document. An empty result means the document is
/// well-formed; the caller decides whether to abort.
pub fn validate_document(doc: &Value) -> Vec<Issue> {
  let mut out = Vec::new();

  for (key, entity) in [("language", Entity::Language), ("version", Entity::Version)] {
    match doc.get(key).filter(|v| !is_blank(v)) {
      None => out.push(issue("", IssueKind::MissingObject(entity))),
      Some(obj) => {
        require_text(&mut out, "", obj, entity, "code");
        require_text(&mut out, "", obj, entity, "name");
      }
    }
  }

  match doc.get("books").and_then(Value::as_array) {
    None => out.push(issue("", IssueKind::MissingArray(None, "books"))),
    Some(books) => {
      for (i, book) in books.iter().enumerate() {
        validate_book(&mut out, &format!("books[{i}]"), book);
      }
    }
  }

  out
}

fn validate_book(out: &mut Vec<Issue>, path: &str, book: &Value) {
  require_text(out, path, book, Entity::Book, "name");
  require_text(out, path, book, Entity::Book, "slug");
  require_number(out, path, book, Entity::Book, "number");

  match book.get("chapters").and_then(Value::as_array) {
    None => out.push(issue(path, IssueKind::MissingArray(Some(Entity::Book), "chapters"))),
    Some(chapters) => {
      for (i, chapter) in chapters.iter().enumerate() {
        validate_chapter(out, &format!("{path}.chapters[{i}]"), chapter);
      }
    }
  }
}

fn validate_chapter(out: &mut Vec<Issue>, path: &str, chapter: &Value) {
  require_number(out, path, chapter, Entity::Chapter, "chapterNum");

  match chapter.get("verses").and_then(Value::as_array) {
    None => out.push(issue(path, IssueKind::MissingArray(Some(Entity::Chapter), "verses"))),
    Some(verses) => {
      for (i, verse) in verses.iter().enumerate() {
        validate_verse(out, &format!("{path}.verses[{i}]"), verse);
      }
    }
  }
}

fn validate_verse(out: &mut Vec<Issue>, path: &str, verse: &Value) {
  require_number(out, path, verse, Entity::Verse, "verseNumber");
  require_text(out, path, verse, Entity::Verse, "text");

  // Audios are optional; only an actual array is walked.
  if let Some(audios) = verse.get("audios").and_then(Value::as_array) {
    for (i, audio) in audios.iter().enumerate() {
      let path = format!("{path}.audios[{i}]");
      require_text(out, &path, audio, Entity::Audio, "language");
      require_text(out, &path, audio, Entity::Audio, "url");
    }
  }
}

// ─── Field checks ────────────────────────────────────────────────────────────

fn issue(path: &str, kind: IssueKind) -> Issue {
  Issue { path: path.to_owned(), kind }
}

/// Absent, null, `false` and `""` all count as missing.
fn is_blank(v: &Value) -> bool {
  match v {
    Value::Null | Value::Bool(false) => true,
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

fn require_text(
  out: &mut Vec<Issue>,
  path: &str,
  obj: &Value,
  entity: Entity,
  field: &'static str,
) {
  if obj.get(field).is_none_or(is_blank) {
    out.push(issue(path, IssueKind::MissingField(entity, field)));
  }
}

/// Numbers only need to be present; `0` is a legal value.
fn require_number(
  out: &mut Vec<Issue>,
  path: &str,
  obj: &Value,
  entity: Entity,
  field: &'static str,
) {
  if obj.get(field).is_none_or(Value::is_null) {
    out.push(issue(path, IssueKind::MissingField(entity, field)));
  }
}
