//! Mapping between SQLite rows and domain types.
//!
//! Each entity has a column list and a decoder taking the column offset, so
//! joined queries can decode several entities from one row.

use bible_core::model::{Audio, Book, Chapter, Language, Verse, Version};
use rusqlite::Row;

pub const LANGUAGE_COLS: &str = "id, code, name";
pub const VERSION_COLS: &str = "id, code, name, language_id";
pub const BOOK_COLS: &str = "id, slug, name, number";
pub const CHAPTER_COLS: &str = "id, book_id, chapter_num";
pub const VERSE_COLS: &str = "id, chapter_id, version_id, verse_number, text";
pub const AUDIO_COLS: &str = "id, verse_id, language, url, duration, format";

/// Prefix every column of `cols` with `alias.` for use in joins.
pub fn qualify(alias: &str, cols: &str) -> String {
  cols
    .split(", ")
    .map(|c| format!("{alias}.{c}"))
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn decode_language(row: &Row<'_>, at: usize) -> rusqlite::Result<Language> {
  Ok(Language {
    id:   row.get(at)?,
    code: row.get(at + 1)?,
    name: row.get(at + 2)?,
  })
}

pub fn decode_version(row: &Row<'_>, at: usize) -> rusqlite::Result<Version> {
  Ok(Version {
    id:          row.get(at)?,
    code:        row.get(at + 1)?,
    name:        row.get(at + 2)?,
    language_id: row.get(at + 3)?,
  })
}

pub fn decode_book(row: &Row<'_>, at: usize) -> rusqlite::Result<Book> {
  Ok(Book {
    id:     row.get(at)?,
    slug:   row.get(at + 1)?,
    name:   row.get(at + 2)?,
    number: row.get(at + 3)?,
  })
}

pub fn decode_chapter(row: &Row<'_>, at: usize) -> rusqlite::Result<Chapter> {
  Ok(Chapter {
    id:          row.get(at)?,
    book_id:     row.get(at + 1)?,
    chapter_num: row.get(at + 2)?,
  })
}

pub fn decode_verse(row: &Row<'_>, at: usize) -> rusqlite::Result<Verse> {
  Ok(Verse {
    id:           row.get(at)?,
    chapter_id:   row.get(at + 1)?,
    version_id:   row.get(at + 2)?,
    verse_number: row.get(at + 3)?,
    text:         row.get(at + 4)?,
  })
}

pub fn decode_audio(row: &Row<'_>, at: usize) -> rusqlite::Result<Audio> {
  Ok(Audio {
    id:       row.get(at)?,
    verse_id: row.get(at + 1)?,
    language: row.get(at + 2)?,
    url:      row.get(at + 3)?,
    duration: row.get(at + 4)?,
    format:   row.get(at + 5)?,
  })
}

/// `?1, ?2, ...` placeholders for an `IN (...)` list of `n` values.
pub fn placeholders(n: usize) -> String {
  (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}
