//! The `BibleStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `bible-store-sqlite`).
//! The API and the loaders depend on this abstraction and receive a store
//! handle explicitly; there is no process-wide client.

use std::future::Future;

use serde::Serialize;

use crate::model::{Audio, Book, Chapter, Language, NewAudio, Verse, Version};

/// Upper bound on the number of verses a text search returns.
pub const SEARCH_RESULT_CAP: usize = 100;

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`BibleStore::search_verses`].
#[derive(Debug, Clone)]
pub struct VerseQuery {
  /// Case-insensitive substring matched against verse text.
  pub text:       String,
  /// Restrict results to one version.
  pub version_id: Option<i64>,
  /// Clamped to [`SEARCH_RESULT_CAP`] by the store.
  pub limit:      usize,
}

impl VerseQuery {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into(), version_id: None, limit: SEARCH_RESULT_CAP }
  }
}

/// Full natural-key address of a verse, as used by the audio attacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseAddress {
  pub version_code: String,
  pub book_slug:    String,
  pub chapter_num:  i64,
  pub verse_number: i64,
}

/// A search match joined out to every entity on its path.
#[derive(Debug, Clone)]
pub struct SearchHit {
  pub language: Language,
  pub version:  Version,
  pub book:     Book,
  pub chapter:  Chapter,
  pub verse:    Verse,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
  pub languages: u64,
  pub versions:  u64,
  pub books:     u64,
  pub chapters:  u64,
  pub verses:    u64,
  pub audios:    u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Bible store backend.
///
/// Writes are upserts keyed on natural keys: calling any `upsert_*` twice with
/// the same key keeps the row identity and overwrites the mutable fields.
/// Nothing is ever deleted.
///
/// All `list_*` methods return rows in canonical order: books by `number`,
/// chapters by `chapter_num`, verses by `verse_number`, audios by insertion.
pub trait BibleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Upserts ───────────────────────────────────────────────────────────

  fn upsert_language<'a>(
    &'a self,
    code: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Language, Self::Error>> + Send + 'a;

  /// Upsert by `code`; an existing version is re-pointed at `language_id`.
  fn upsert_version<'a>(
    &'a self,
    code: &'a str,
    name: &'a str,
    language_id: i64,
  ) -> impl Future<Output = Result<Version, Self::Error>> + Send + 'a;

  fn upsert_book<'a>(
    &'a self,
    slug: &'a str,
    name: &'a str,
    number: i64,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + 'a;

  fn upsert_chapter(
    &self,
    book_id: i64,
    chapter_num: i64,
  ) -> impl Future<Output = Result<Chapter, Self::Error>> + Send + '_;

  fn upsert_verse<'a>(
    &'a self,
    version_id: i64,
    chapter_id: i64,
    verse_number: i64,
    text: &'a str,
  ) -> impl Future<Output = Result<Verse, Self::Error>> + Send + 'a;

  /// Overwrite the audio row with the given id. Returns `None` if no such row
  /// exists; nothing is inserted in that case.
  fn update_audio<'a>(
    &'a self,
    id: i64,
    audio: &'a NewAudio,
  ) -> impl Future<Output = Result<Option<Audio>, Self::Error>> + Send + 'a;

  /// Insert an audio row for `verse_id` unless one with the same
  /// `(language, url)` is already attached. The flag is `true` when a row was
  /// inserted.
  fn ensure_audio<'a>(
    &'a self,
    verse_id: i64,
    audio: &'a NewAudio,
  ) -> impl Future<Output = Result<(Audio, bool), Self::Error>> + Send + 'a;

  // ── Unique lookups ────────────────────────────────────────────────────

  fn find_language<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Language>, Self::Error>> + Send + 'a;

  fn get_language(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Language>, Self::Error>> + Send + '_;

  fn find_version<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Version>, Self::Error>> + Send + 'a;

  fn find_book<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + 'a;

  fn find_chapter(
    &self,
    book_id: i64,
    chapter_num: i64,
  ) -> impl Future<Output = Result<Option<Chapter>, Self::Error>> + Send + '_;

  fn find_verse(
    &self,
    version_id: i64,
    chapter_id: i64,
    verse_number: i64,
  ) -> impl Future<Output = Result<Option<Verse>, Self::Error>> + Send + '_;

  /// Resolve a verse through version code, book slug and chapter number.
  fn find_verse_at<'a>(
    &'a self,
    address: &'a VerseAddress,
  ) -> impl Future<Output = Result<Option<Verse>, Self::Error>> + Send + 'a;

  // ── Ordered lists ─────────────────────────────────────────────────────

  /// Versions of a language in insertion order; the first one is the
  /// language's default version.
  fn list_versions(
    &self,
    language_id: i64,
  ) -> impl Future<Output = Result<Vec<Version>, Self::Error>> + Send + '_;

  fn list_books(
    &self,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  fn list_chapters(
    &self,
    book_id: i64,
  ) -> impl Future<Output = Result<Vec<Chapter>, Self::Error>> + Send + '_;

  /// Verses of one chapter in one version.
  fn list_verses(
    &self,
    version_id: i64,
    chapter_id: i64,
  ) -> impl Future<Output = Result<Vec<Verse>, Self::Error>> + Send + '_;

  /// Verses of every chapter of a book in one version, ordered by chapter
  /// number and then verse number.
  fn list_book_verses(
    &self,
    version_id: i64,
    book_id: i64,
  ) -> impl Future<Output = Result<Vec<Verse>, Self::Error>> + Send + '_;

  /// Audios attached to any of `verse_ids`.
  fn list_audios<'a>(
    &'a self,
    verse_ids: &'a [i64],
  ) -> impl Future<Output = Result<Vec<Audio>, Self::Error>> + Send + 'a;

  // ── Search & stats ────────────────────────────────────────────────────

  fn search_verses<'a>(
    &'a self,
    query: &'a VerseQuery,
  ) -> impl Future<Output = Result<Vec<SearchHit>, Self::Error>> + Send + 'a;

  fn counts(
    &self,
  ) -> impl Future<Output = Result<StoreCounts, Self::Error>> + Send + '_;
}
