//! Folder-tree loader for `<data>/<language>/<book>/<chapter>.json`.

use std::path::{Path, PathBuf};

use bible_core::{
  catalog::Catalog,
  document::{ChapterFile, ContentEntry},
  model::Version,
  store::BibleStore,
};
use walkdir::WalkDir;

use crate::{Error, LoadReport, Result, read_json};

// ─── Layout ──────────────────────────────────────────────────────────────────

/// One book directory under a language directory.
#[derive(Debug, Clone)]
pub struct BookDir {
  pub slug: String,
  pub path: PathBuf,
}

/// One chapter file; `number` comes from the file stem.
#[derive(Debug, Clone)]
pub struct ChapterPath {
  pub number: i64,
  pub path:   PathBuf,
}

/// Book directories of `language_code`, sorted by name.
pub fn scan_language(data_dir: &Path, language_code: &str) -> Result<Vec<BookDir>> {
  let root = data_dir.join(language_code);
  if !root.is_dir() {
    return Err(Error::MissingLanguageDir(root));
  }

  let mut books = Vec::new();
  for entry in WalkDir::new(&root).min_depth(1).max_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|source| Error::Walk { path: root.clone(), source })?;
    if !entry.file_type().is_dir() {
      continue;
    }
    books.push(BookDir {
      slug: entry.file_name().to_string_lossy().into_owned(),
      path: entry.into_path(),
    });
  }
  Ok(books)
}

impl BookDir {
  /// `*.json` chapter files in numeric order. Files whose stem is not an
  /// integer are skipped with a warning.
  pub fn chapters(&self) -> Result<Vec<ChapterPath>> {
    let mut chapters = Vec::new();
    for entry in WalkDir::new(&self.path).min_depth(1).max_depth(1) {
      let entry = entry.map_err(|source| Error::Walk { path: self.path.clone(), source })?;
      if !entry.file_type().is_file() {
        continue;
      }
      let path = entry.into_path();
      if path.extension().is_none_or(|ext| ext != "json") {
        continue;
      }

      let number = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse::<i64>().ok());
      match number {
        Some(number) => chapters.push(ChapterPath { number, path }),
        None => {
          tracing::warn!(book = %self.slug, file = %path.display(), "Skipping non-numeric chapter file");
        }
      }
    }
    chapters.sort_by_key(|c| c.number);
    Ok(chapters)
  }
}

// ─── Loader ──────────────────────────────────────────────────────────────────

/// Load every book of `language_code` under `data_dir`.
///
/// A missing language directory or a failing language/version upsert is
/// fatal. Book and chapter failures are recorded and skipped; the report
/// counts loaded chapters.
pub async fn load_folder<S: BibleStore>(
  store: &S,
  data_dir: &Path,
  language_code: &str,
  catalog: &Catalog,
) -> Result<LoadReport> {
  let books = scan_language(data_dir, language_code)?;

  let language = store
    .upsert_language(language_code, &catalog.language_name(language_code))
    .await
    .map_err(Error::store)?;
  let names = catalog.version_for(language_code);
  let version = store
    .upsert_version(&names.code, &names.name, language.id)
    .await
    .map_err(Error::store)?;
  tracing::info!(
    language = %language.code,
    version = %version.code,
    books = books.len(),
    "Processing language"
  );

  let mut report = LoadReport::new("chapter");
  for book in &books {
    if let Err(e) = load_book(store, &version, book, catalog, &mut report).await {
      report.fail(format!("book {}", book.slug), &e);
    }
  }
  Ok(report)
}

/// Catalog name and number, else the first chapter's `book` field (or the
/// slug) and number 0.
fn book_names(book: &BookDir, chapters: &[ChapterPath], catalog: &Catalog) -> (String, i64) {
  if let Some(entry) = catalog.book(&book.slug) {
    return (entry.name.clone(), entry.number);
  }
  let from_file = chapters.first().and_then(|first| {
    read_json::<ChapterFile>(&first.path)
      .inspect_err(|e| tracing::warn!(book = %book.slug, "cannot read book name: {e}"))
      .ok()
      .and_then(|f| f.book)
      .filter(|name| !name.is_empty())
  });
  (from_file.unwrap_or_else(|| book.slug.clone()), 0)
}

async fn load_book<S: BibleStore>(
  store: &S,
  version: &Version,
  book: &BookDir,
  catalog: &Catalog,
  report: &mut LoadReport,
) -> Result<()> {
  let chapters = book.chapters()?;
  let (name, number) = book_names(book, &chapters, catalog);

  let row = store
    .upsert_book(&book.slug, &name, number)
    .await
    .map_err(Error::store)?;
  tracing::info!(book = %book.slug, %name, chapters = chapters.len(), "Processing book");

  for chapter in &chapters {
    match load_chapter(store, version.id, row.id, &book.slug, chapter).await {
      Ok(verses) => {
        tracing::info!(book = %book.slug, chapter = chapter.number, verses, "Processed chapter");
        report.success();
      }
      Err(e) => report.fail(format!("{} chapter {}", book.slug, chapter.number), &e),
    }
  }
  Ok(())
}

/// Returns the number of verses written.
async fn load_chapter<S: BibleStore>(
  store: &S,
  version_id: i64,
  book_id: i64,
  book_slug: &str,
  chapter: &ChapterPath,
) -> Result<usize> {
  let file: ChapterFile = read_json(&chapter.path)?;
  let row = store
    .upsert_chapter(book_id, chapter.number)
    .await
    .map_err(Error::store)?;

  let mut written = 0;
  for entry in file.entries() {
    match entry {
      ContentEntry::Heading => {}
      ContentEntry::Invalid { key, reason } => {
        tracing::warn!(
          book = book_slug,
          chapter = chapter.number,
          %key,
          "Skipping invalid verse entry: {reason}"
        );
      }
      ContentEntry::Verse { number, text } => {
        store
          .upsert_verse(version_id, row.id, number, &text)
          .await
          .map_err(Error::store)?;
        written += 1;
      }
    }
  }
  Ok(written)
}
