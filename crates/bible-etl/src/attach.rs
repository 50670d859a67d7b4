//! Audio attacher: links audio records to existing verses.

use bible_core::{
  document::AudioAttachment,
  model::NewAudio,
  store::{BibleStore, VerseAddress},
};

use crate::{Error, LoadReport, Result};

/// Attach every record in `records`.
///
/// A record whose verse does not exist is a failure; the batch continues.
/// An audio already attached with the same language and URL counts as a
/// success and is not duplicated.
pub async fn attach_audio<S: BibleStore>(store: &S, records: &[AudioAttachment]) -> LoadReport {
  let mut report = LoadReport::new("audio");
  for record in records {
    match attach_one(store, record).await {
      Ok(true) => {
        tracing::info!("Audio attached to {}", record.reference());
        report.success();
      }
      Ok(false) => {
        tracing::info!("Audio already attached to {}", record.reference());
        report.success();
      }
      Err(e) => report.fail(record.reference(), &e),
    }
  }
  report
}

/// Returns `true` when a new audio row was inserted.
async fn attach_one<S: BibleStore>(store: &S, record: &AudioAttachment) -> Result<bool> {
  let address = VerseAddress {
    version_code: record.version_code.clone(),
    book_slug:    record.book_slug.clone(),
    chapter_num:  record.chapter_num,
    verse_number: record.verse_number,
  };
  let verse = store
    .find_verse_at(&address)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::VerseNotFound(record.reference()))?;

  let (_, inserted) = store
    .ensure_audio(verse.id, &NewAudio::from(&record.audio))
    .await
    .map_err(Error::store)?;
  Ok(inserted)
}
