//! Response bodies and their assembly from store rows.
//!
//! Every body is denormalized: it repeats the language and version it was
//! resolved through and nests books, chapters, verses and audios by value.

use std::collections::HashMap;

use bible_core::{
  model::{Audio, Book, Chapter, Language, Verse, Version},
  store::BibleStore,
};
use serde::Serialize;

use crate::error::ApiError;

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// Language and version a response was resolved through.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
  pub language:      String,
  pub language_name: String,
  pub version:       String,
  pub version_name:  String,
}

impl Edition {
  pub fn new(language: &Language, version: &Version) -> Self {
    Self {
      language:      language.code.clone(),
      language_name: language.name.clone(),
      version:       version.code.clone(),
      version_name:  version.name.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct BibleBody {
  #[serde(flatten)]
  pub edition: Edition,
  pub books:   Vec<BookJson>,
}

#[derive(Debug, Serialize)]
pub struct BookBody {
  #[serde(flatten)]
  pub edition: Edition,
  pub book:    BookJson,
}

#[derive(Debug, Serialize)]
pub struct ChapterBody {
  #[serde(flatten)]
  pub edition: Edition,
  pub book:    BookRef,
  pub chapter: ChapterJson,
}

#[derive(Debug, Serialize)]
pub struct VerseBody {
  #[serde(flatten)]
  pub edition: Edition,
  pub book:    BookRef,
  pub chapter: ChapterRef,
  pub verse:   VerseJson,
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
  pub query:   String,
  pub count:   usize,
  pub results: Vec<VerseBody>,
}

#[derive(Debug, Serialize)]
pub struct BookJson {
  pub name:     String,
  pub slug:     String,
  pub number:   i64,
  pub chapters: Vec<ChapterJson>,
}

#[derive(Debug, Serialize)]
pub struct BookRef {
  pub name:   String,
  pub slug:   String,
  pub number: i64,
}

impl From<&Book> for BookRef {
  fn from(b: &Book) -> Self {
    Self { name: b.name.clone(), slug: b.slug.clone(), number: b.number }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterJson {
  pub chapter_num: i64,
  pub verses:      Vec<VerseJson>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRef {
  pub chapter_num: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseJson {
  pub verse_number: i64,
  pub text:         String,
  pub audios:       Vec<AudioJson>,
}

#[derive(Debug, Serialize)]
pub struct AudioJson {
  pub language: String,
  pub url:      String,
  pub duration: Option<f64>,
  pub format:   Option<String>,
}

impl From<Audio> for AudioJson {
  fn from(a: Audio) -> Self {
    Self { language: a.language, url: a.url, duration: a.duration, format: a.format }
  }
}

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Audios of `verses`, grouped by verse id in insertion order.
pub async fn audios_by_verse<S: BibleStore>(
  store: &S,
  verses: &[Verse],
) -> Result<HashMap<i64, Vec<AudioJson>>, ApiError> {
  let ids: Vec<i64> = verses.iter().map(|v| v.id).collect();
  let audios = store.list_audios(&ids).await.map_err(ApiError::store)?;

  let mut grouped: HashMap<i64, Vec<AudioJson>> = HashMap::new();
  for audio in audios {
    grouped.entry(audio.verse_id).or_default().push(audio.into());
  }
  Ok(grouped)
}

pub fn verse_json(verse: Verse, audios: &mut HashMap<i64, Vec<AudioJson>>) -> VerseJson {
  VerseJson {
    audios:       audios.remove(&verse.id).unwrap_or_default(),
    verse_number: verse.verse_number,
    text:         verse.text,
  }
}

/// Verses of one chapter in `version`, with their audios.
pub async fn chapter_json<S: BibleStore>(
  store: &S,
  version: &Version,
  chapter: &Chapter,
) -> Result<ChapterJson, ApiError> {
  let verses = store
    .list_verses(version.id, chapter.id)
    .await
    .map_err(ApiError::store)?;
  let mut audios = audios_by_verse(store, &verses).await?;

  Ok(ChapterJson {
    chapter_num: chapter.chapter_num,
    verses:      verses.into_iter().map(|v| verse_json(v, &mut audios)).collect(),
  })
}

/// A book with every chapter, and every verse of `version` in it.
///
/// Chapters without verses in this version are still listed, with an empty
/// verse list.
pub async fn book_json<S: BibleStore>(
  store: &S,
  version: &Version,
  book: &Book,
) -> Result<BookJson, ApiError> {
  let chapters = store.list_chapters(book.id).await.map_err(ApiError::store)?;
  let verses = store
    .list_book_verses(version.id, book.id)
    .await
    .map_err(ApiError::store)?;
  let mut audios = audios_by_verse(store, &verses).await?;

  let mut by_chapter: HashMap<i64, Vec<VerseJson>> = HashMap::new();
  for verse in verses {
    let chapter_id = verse.chapter_id;
    by_chapter
      .entry(chapter_id)
      .or_default()
      .push(verse_json(verse, &mut audios));
  }

  Ok(BookJson {
    name:     book.name.clone(),
    slug:     book.slug.clone(),
    number:   book.number,
    chapters: chapters
      .into_iter()
      .map(|c| ChapterJson {
        chapter_num: c.chapter_num,
        verses:      by_chapter.remove(&c.id).unwrap_or_default(),
      })
      .collect(),
  })
}

/// The whole Bible in `version`: every book, in canonical order.
pub async fn bible_body<S: BibleStore>(
  store: &S,
  language: &Language,
  version: &Version,
) -> Result<BibleBody, ApiError> {
  let books = store.list_books().await.map_err(ApiError::store)?;

  let mut out = Vec::with_capacity(books.len());
  for book in &books {
    out.push(book_json(store, version, book).await?);
  }

  Ok(BibleBody { edition: Edition::new(language, version), books: out })
}
