//! Composite-document seed loader.

use std::path::Path;

use bible_core::{
  document::{AudioDoc, BookDoc, SeedDocument},
  model::{Audio, NewAudio},
  store::BibleStore,
};
use serde_json::Value;

use crate::{Error, LoadReport, Result, read_json};

/// Read `path` and turn it into a [`SeedDocument`], running the shape check
/// and the validator. Nothing is written.
pub fn read_document(path: &Path) -> Result<SeedDocument> {
  let value: Value = read_json(path)?;
  Ok(SeedDocument::from_value(value)?)
}

/// Upsert `doc` into `store` in nesting order.
///
/// Language and version failures are fatal; a failing book is recorded in
/// the report and the next book is processed. Re-running with the same
/// document leaves the store unchanged.
pub async fn seed<S: BibleStore>(store: &S, doc: &SeedDocument) -> Result<LoadReport> {
  let language = store
    .upsert_language(&doc.language.code, &doc.language.name)
    .await
    .map_err(Error::store)?;
  let version = store
    .upsert_version(&doc.version.code, &doc.version.name, language.id)
    .await
    .map_err(Error::store)?;
  tracing::info!(language = %language.code, version = %version.code, "Seeding");

  let mut report = LoadReport::new("book");
  for book in &doc.books {
    match seed_book(store, version.id, book).await {
      Ok(()) => {
        tracing::info!(book = %book.slug, chapters = book.chapters.len(), "Seeded book");
        report.success();
      }
      Err(e) => report.fail(format!("book {}", book.slug), &e),
    }
  }
  Ok(report)
}

async fn seed_book<S: BibleStore>(store: &S, version_id: i64, book: &BookDoc) -> Result<()> {
  let row = store
    .upsert_book(&book.slug, &book.name, book.number)
    .await
    .map_err(Error::store)?;

  for chapter in &book.chapters {
    let chapter_row = store
      .upsert_chapter(row.id, chapter.chapter_num)
      .await
      .map_err(Error::store)?;

    for verse in &chapter.verses {
      let verse_row = store
        .upsert_verse(version_id, chapter_row.id, verse.verse_number, &verse.text)
        .await
        .map_err(Error::store)?;
      for audio in &verse.audios {
        put_audio(store, verse_row.id, audio).await?;
      }
    }
    tracing::debug!(
      book = %book.slug,
      chapter = chapter.chapter_num,
      verses = chapter.verses.len(),
      "Seeded chapter"
    );
  }
  Ok(())
}

/// Overwrite the row named by `audio.id` when it exists; otherwise attach
/// the audio to `verse_id` unless an identical one is already there.
async fn put_audio<S: BibleStore>(store: &S, verse_id: i64, audio: &AudioDoc) -> Result<Audio> {
  let new = NewAudio::from(audio);
  if let Some(id) = audio.id
    && let Some(updated) = store.update_audio(id, &new).await.map_err(Error::store)?
  {
    return Ok(updated);
  }
  let (row, _) = store.ensure_audio(verse_id, &new).await.map_err(Error::store)?;
  Ok(row)
}
