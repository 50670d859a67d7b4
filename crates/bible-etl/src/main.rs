//! `bible-etl`: load Bible JSON data into the store.
//!
//! # Usage
//!
//! ```text
//! bible-etl validate data/kjv.json
//! bible-etl --db bible.db seed data/kjv.json
//! bible-etl load-folder ruanglat --data-dir data --catalog catalog.toml
//! bible-etl attach-audio data/ruanglat-audio.json
//! bible-etl generate-audio ruanglat data/ruanglat-audio.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bible_core::{Error as CoreError, document::AudioAttachment};
use bible_etl::{
  Error, LoadReport, attach, folder,
  generate::{self, DEFAULT_URL_TEMPLATE, GenerateOptions},
  load_catalog, read_json, seed, write_json,
};
use bible_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bible-etl", version, about = "Load Bible JSON data into the store")]
struct Args {
  /// Path to the SQLite store.
  #[arg(long, global = true, env = "BIBLE_STORE_PATH", default_value = "bible.db")]
  db: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Check a composite document without touching the store.
  Validate { file: PathBuf },

  /// Upsert a composite `{language, version, books}` document.
  Seed { file: PathBuf },

  /// Load `<data-dir>/<language>/<book>/<chapter>.json` files.
  LoadFolder {
    language: String,
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// TOML file with language, version and book names.
    #[arg(long, default_value = "catalog.toml")]
    catalog:  PathBuf,
  },

  /// Attach audio records to existing verses.
  AttachAudio { file: PathBuf },

  /// Write attach-audio records for every verse in a folder tree.
  GenerateAudio {
    language:     String,
    output:       PathBuf,
    #[arg(long, default_value = "data")]
    data_dir:     PathBuf,
    #[arg(long, default_value = "catalog.toml")]
    catalog:      PathBuf,
    /// URL template with `{book}`, `{chapter}` and `{verse}` placeholders.
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE)]
    url_template: String,
    #[arg(long, default_value = "mp3")]
    format:       String,
    /// Duration in seconds to put on every record.
    #[arg(long)]
    duration:     Option<f64>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  match args.command {
    Command::Validate { file } => validate(&file),
    Command::Seed { file } => {
      let doc = read_document(&file)?;
      let stats = doc.stats();
      println!(
        "{} contains {} books, {} chapters, {} verses, {} audios",
        file.display(),
        stats.books,
        stats.chapters,
        stats.verses,
        stats.audios
      );
      let store = open_store(&args.db).await?;
      let report = seed::seed(&store, &doc).await.context("seeding failed")?;
      finish(store, report).await
    }
    Command::LoadFolder { language, data_dir, catalog } => {
      let catalog = load_catalog(&catalog)?;
      let store = open_store(&args.db).await?;
      let report = folder::load_folder(&store, &data_dir, &language, &catalog)
        .await
        .with_context(|| format!("loading language {language}"))?;
      finish(store, report).await
    }
    Command::AttachAudio { file } => {
      let records: Vec<AudioAttachment> =
        read_json(&file).context("invalid audio data format: expected an array")?;
      println!("Found {} audio records to attach", records.len());
      let store = open_store(&args.db).await?;
      let report = attach::attach_audio(&store, &records).await;
      finish(store, report).await
    }
    Command::GenerateAudio {
      language,
      output,
      data_dir,
      catalog,
      url_template,
      format,
      duration,
    } => {
      let catalog = load_catalog(&catalog)?;
      let options = GenerateOptions { url_template, format: Some(format), duration };
      let records = generate::generate_audio_records(&data_dir, &language, &catalog, &options)?;
      write_json(&output, &records)?;
      println!(
        "Generated audio attachment data for {} verses, written to {}",
        records.len(),
        output.display()
      );
      Ok(())
    }
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn open_store(path: &Path) -> Result<SqliteStore> {
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {}", path.display()))
}

/// Parse and validate, printing every issue on failure.
fn read_document(file: &Path) -> Result<bible_core::document::SeedDocument> {
  match seed::read_document(file) {
    Ok(doc) => Ok(doc),
    Err(Error::Core(CoreError::Validation(issues))) => {
      for issue in &issues {
        eprintln!("  - {issue}");
      }
      bail!("{} has {} validation issue(s)", file.display(), issues.len())
    }
    Err(e) => Err(e.into()),
  }
}

fn validate(file: &Path) -> Result<()> {
  let stats = read_document(file)?.stats();
  println!("{} is valid", file.display());
  println!("  books:  {}", stats.books);
  println!("  verses: {}", stats.verses);
  println!("  audios: {}", stats.audios);
  Ok(())
}

/// Close the store, print the summary, and fail when anything failed.
async fn finish(store: SqliteStore, report: LoadReport) -> Result<()> {
  store.close().await.context("failed to close store")?;

  println!("{report}");
  if report.is_clean() {
    return Ok(());
  }
  for failure in &report.failures {
    eprintln!("  - {}: {}", failure.target, failure.error);
  }
  bail!("{} failure(s)", report.failures.len())
}
