//! Generates attach-audio records for a folder tree.

use std::path::Path;

use bible_core::{
  catalog::Catalog,
  document::{AudioAttachment, AudioDoc, ChapterFile, ContentEntry},
};

use crate::{Result, folder::scan_language, read_json};

pub const DEFAULT_URL_TEMPLATE: &str = "https://example.com/audio/{book}/{chapter}/{verse}.mp3";

#[derive(Debug, Clone)]
pub struct GenerateOptions {
  /// URL with `{book}`, `{chapter}` and `{verse}` placeholders.
  pub url_template: String,
  pub format:       Option<String>,
  /// Seconds, applied to every record.
  pub duration:     Option<f64>,
}

impl Default for GenerateOptions {
  fn default() -> Self {
    Self {
      url_template: DEFAULT_URL_TEMPLATE.to_owned(),
      format:       Some("mp3".to_owned()),
      duration:     None,
    }
  }
}

pub fn render_url(template: &str, book: &str, chapter: i64, verse: i64) -> String {
  template
    .replace("{book}", book)
    .replace("{chapter}", &chapter.to_string())
    .replace("{verse}", &verse.to_string())
}

/// One record per numbered verse of `language_code`, in book, chapter and
/// file order. Unreadable files are fatal.
pub fn generate_audio_records(
  data_dir: &Path,
  language_code: &str,
  catalog: &Catalog,
  options: &GenerateOptions,
) -> Result<Vec<AudioAttachment>> {
  let version_code = catalog.version_for(language_code).code;
  let mut records = Vec::new();

  for book in scan_language(data_dir, language_code)? {
    for chapter in book.chapters()? {
      let file: ChapterFile = read_json(&chapter.path)?;
      for entry in file.entries() {
        let ContentEntry::Verse { number, .. } = entry else {
          continue;
        };
        records.push(AudioAttachment {
          version_code: version_code.clone(),
          book_slug:    book.slug.clone(),
          chapter_num:  chapter.number,
          verse_number: number,
          audio:        AudioDoc {
            id:       None,
            language: language_code.to_owned(),
            url:      render_url(&options.url_template, &book.slug, chapter.number, number),
            duration: options.duration,
            format:   options.format.clone(),
          },
        });
      }
    }
  }

  tracing::debug!(records = records.len(), "Generated audio records");
  Ok(records)
}
