//! Handlers for the hierarchical `/bible` lookups.
//!
//! | Path | Body |
//! |------|------|
//! | `/bible/language/{languageCode}` | [`BibleBody`] in the language's first version |
//! | `/bible/{languageCode}` | same, legacy alias |
//! | `/bible/version/{versionCode}` | [`BibleBody`] |
//! | `/bible/version/{versionCode}/book/{bookSlug}` | [`BookBody`] |
//! | `.../chapter/{chapterNum}` | [`ChapterBody`] |
//! | `.../chapter/{chapterNum}/verse/{verseNum}` | [`VerseBody`] |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use bible_core::{
  model::{Book, Chapter, Language, Version},
  store::BibleStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  views::{
    BibleBody, BookBody, BookRef, ChapterBody, ChapterRef, Edition, VerseBody,
    audios_by_verse, bible_body, book_json, chapter_json, verse_json,
  },
};

// ─── Path parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePath {
  pub language_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPath {
  pub version_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPath {
  pub version_code: String,
  pub book_slug:    String,
}

/// Numbers stay strings here so a malformed value is a 400 with our own
/// message rather than an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPath {
  pub version_code: String,
  pub book_slug:    String,
  pub chapter_num:  String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersePath {
  pub version_code: String,
  pub book_slug:    String,
  pub chapter_num:  String,
  pub verse_num:    String,
}

fn parse_number(raw: &str, what: &str) -> Result<i64, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::Validation(format!("{what} number must be a valid number")))
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Version by code plus its owning language.
async fn resolve_version<S: BibleStore>(
  store: &S,
  code: &str,
  missing: impl FnOnce() -> String,
) -> Result<(Language, Version), ApiError> {
  let version = store
    .find_version(code)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(missing()))?;
  let language = store
    .get_language(version.language_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("Language for version '{code}' not found"))
    })?;
  Ok((language, version))
}

async fn resolve_book<S: BibleStore>(store: &S, slug: &str) -> Result<Book, ApiError> {
  store
    .find_book(slug)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("Book '{slug}' not found")))
}

async fn resolve_chapter<S: BibleStore>(
  store: &S,
  book: &Book,
  chapter_num: i64,
) -> Result<Chapter, ApiError> {
  store
    .find_chapter(book.id, chapter_num)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "Chapter {chapter_num} in book '{}' not found",
        book.slug
      ))
    })
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /bible/language/{languageCode}` and `GET /bible/{languageCode}`
///
/// Uses the language's first version (lowest id).
pub async fn by_language<S: BibleStore>(
  State(store): State<Arc<S>>,
  Path(path): Path<LanguagePath>,
) -> Result<Json<BibleBody>, ApiError> {
  let code = path.language_code;
  let missing = || ApiError::NotFound(format!("Bible data for language '{code}' not found"));

  let language = store
    .find_language(&code)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(missing)?;
  let version = store
    .list_versions(language.id)
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .next()
    .ok_or_else(missing)?;

  Ok(Json(bible_body(store.as_ref(), &language, &version).await?))
}

/// `GET /bible/version/{versionCode}`
pub async fn by_version<S: BibleStore>(
  State(store): State<Arc<S>>,
  Path(path): Path<VersionPath>,
) -> Result<Json<BibleBody>, ApiError> {
  let code = path.version_code;
  let (language, version) = resolve_version(store.as_ref(), &code, || {
    format!("Bible data for version '{code}' not found")
  })
  .await?;

  Ok(Json(bible_body(store.as_ref(), &language, &version).await?))
}

/// `GET /bible/version/{versionCode}/book/{bookSlug}`
pub async fn book<S: BibleStore>(
  State(store): State<Arc<S>>,
  Path(path): Path<BookPath>,
) -> Result<Json<BookBody>, ApiError> {
  let code = &path.version_code;
  let (language, version) =
    resolve_version(store.as_ref(), code, || format!("Version '{code}' not found")).await?;
  let book = resolve_book(store.as_ref(), &path.book_slug).await?;

  Ok(Json(BookBody {
    edition: Edition::new(&language, &version),
    book:    book_json(store.as_ref(), &version, &book).await?,
  }))
}

/// `GET /bible/version/{versionCode}/book/{bookSlug}/chapter/{chapterNum}`
pub async fn chapter<S: BibleStore>(
  State(store): State<Arc<S>>,
  Path(path): Path<ChapterPath>,
) -> Result<Json<ChapterBody>, ApiError> {
  let chapter_num = parse_number(&path.chapter_num, "Chapter")?;

  let code = &path.version_code;
  let (language, version) =
    resolve_version(store.as_ref(), code, || format!("Version '{code}' not found")).await?;
  let book = resolve_book(store.as_ref(), &path.book_slug).await?;
  let chapter = resolve_chapter(store.as_ref(), &book, chapter_num).await?;

  Ok(Json(ChapterBody {
    edition: Edition::new(&language, &version),
    book:    BookRef::from(&book),
    chapter: chapter_json(store.as_ref(), &version, &chapter).await?,
  }))
}

/// `GET /bible/version/{versionCode}/book/{bookSlug}/chapter/{chapterNum}/verse/{verseNum}`
pub async fn verse<S: BibleStore>(
  State(store): State<Arc<S>>,
  Path(path): Path<VersePath>,
) -> Result<Json<VerseBody>, ApiError> {
  let chapter_num = parse_number(&path.chapter_num, "Chapter")?;
  let verse_number = parse_number(&path.verse_num, "Verse")?;

  let code = &path.version_code;
  let (language, version) =
    resolve_version(store.as_ref(), code, || format!("Version '{code}' not found")).await?;
  let book = resolve_book(store.as_ref(), &path.book_slug).await?;
  let chapter = resolve_chapter(store.as_ref(), &book, chapter_num).await?;

  let verse = store
    .find_verse(version.id, chapter.id, verse_number)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "Verse {verse_number} in chapter {chapter_num} of book '{}' not found",
        book.slug
      ))
    })?;
  let mut audios = audios_by_verse(store.as_ref(), std::slice::from_ref(&verse)).await?;

  Ok(Json(VerseBody {
    edition: Edition::new(&language, &version),
    book:    BookRef::from(&book),
    chapter: ChapterRef { chapter_num: chapter.chapter_num },
    verse:   verse_json(verse, &mut audios),
  }))
}
