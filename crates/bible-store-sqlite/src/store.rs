//! [`SqliteStore`]: the SQLite implementation of [`BibleStore`].

use std::path::Path;

use bible_core::{
  model::{Audio, Book, Chapter, Language, NewAudio, Verse, Version},
  store::{BibleStore, SEARCH_RESULT_CAP, SearchHit, StoreCounts, VerseAddress, VerseQuery},
};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};

use crate::{
  Result,
  encode::{
    AUDIO_COLS, BOOK_COLS, CHAPTER_COLS, LANGUAGE_COLS, VERSE_COLS, VERSION_COLS,
    decode_audio, decode_book, decode_chapter, decode_language, decode_verse, decode_version,
    placeholders, qualify,
  },
  schema::SCHEMA,
};

/// Name of the SQL function backing case-insensitive search.
const CONTAINS_FN: &str = "contains_ci";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Bible store backed by a single SQLite file.
///
/// Cloning is cheap. The inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Close the underlying connection, waiting for queued calls to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        // SQLite's LIKE and lower() only fold ASCII; verse text is not.
        conn.create_scalar_function(
          CONTAINS_FN,
          2,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let haystack: String = ctx.get(0)?;
            let needle: String = ctx.get(1)?;
            Ok(haystack.to_lowercase().contains(&needle.to_lowercase()))
          },
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── BibleStore impl ─────────────────────────────────────────────────────────

impl BibleStore for SqliteStore {
  type Error = crate::Error;

  // ── Upserts ───────────────────────────────────────────────────────────────

  async fn upsert_language(&self, code: &str, name: &str) -> Result<Language> {
    let code = code.to_owned();
    let name = name.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            &format!(
              "INSERT INTO languages (code, name) VALUES (?1, ?2)
               ON CONFLICT (code) DO UPDATE SET name = excluded.name
               RETURNING {LANGUAGE_COLS}"
            ),
            rusqlite::params![code, name],
            |row| decode_language(row, 0),
          )?)
        })
        .await?,
    )
  }

  async fn upsert_version(&self, code: &str, name: &str, language_id: i64) -> Result<Version> {
    let code = code.to_owned();
    let name = name.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            &format!(
              "INSERT INTO versions (code, name, language_id) VALUES (?1, ?2, ?3)
               ON CONFLICT (code) DO UPDATE
                 SET name = excluded.name, language_id = excluded.language_id
               RETURNING {VERSION_COLS}"
            ),
            rusqlite::params![code, name, language_id],
            |row| decode_version(row, 0),
          )?)
        })
        .await?,
    )
  }

  async fn upsert_book(&self, slug: &str, name: &str, number: i64) -> Result<Book> {
    let slug = slug.to_owned();
    let name = name.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            &format!(
              "INSERT INTO books (slug, name, number) VALUES (?1, ?2, ?3)
               ON CONFLICT (slug) DO UPDATE
                 SET name = excluded.name, number = excluded.number
               RETURNING {BOOK_COLS}"
            ),
            rusqlite::params![slug, name, number],
            |row| decode_book(row, 0),
          )?)
        })
        .await?,
    )
  }

  async fn upsert_chapter(&self, book_id: i64, chapter_num: i64) -> Result<Chapter> {
    Ok(
      self
        .conn
        .call(move |conn| {
          // A chapter has no mutable fields; the no-op update makes RETURNING
          // yield the existing row.
          Ok(conn.query_row(
            &format!(
              "INSERT INTO chapters (book_id, chapter_num) VALUES (?1, ?2)
               ON CONFLICT (book_id, chapter_num) DO UPDATE
                 SET chapter_num = excluded.chapter_num
               RETURNING {CHAPTER_COLS}"
            ),
            rusqlite::params![book_id, chapter_num],
            |row| decode_chapter(row, 0),
          )?)
        })
        .await?,
    )
  }

  async fn upsert_verse(
    &self,
    version_id:   i64,
    chapter_id:   i64,
    verse_number: i64,
    text:         &str,
  ) -> Result<Verse> {
    let text = text.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            &format!(
              "INSERT INTO verses (version_id, chapter_id, verse_number, text)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT (version_id, chapter_id, verse_number) DO UPDATE
                 SET text = excluded.text
               RETURNING {VERSE_COLS}"
            ),
            rusqlite::params![version_id, chapter_id, verse_number, text],
            |row| decode_verse(row, 0),
          )?)
        })
        .await?,
    )
  }

  async fn update_audio(&self, id: i64, audio: &NewAudio) -> Result<Option<Audio>> {
    let audio = audio.clone();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "UPDATE audios SET language = ?2, url = ?3, duration = ?4, format = ?5
                   WHERE id = ?1
                   RETURNING {AUDIO_COLS}"
                ),
                rusqlite::params![id, audio.language, audio.url, audio.duration, audio.format],
                |row| decode_audio(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn ensure_audio(&self, verse_id: i64, audio: &NewAudio) -> Result<(Audio, bool)> {
    let audio = audio.clone();

    Ok(
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          let existing = tx
            .query_row(
              &format!(
                "SELECT {AUDIO_COLS} FROM audios
                 WHERE verse_id = ?1 AND language = ?2 AND url = ?3
                 ORDER BY id LIMIT 1"
              ),
              rusqlite::params![verse_id, audio.language, audio.url],
              |row| decode_audio(row, 0),
            )
            .optional()?;

          let result = match existing {
            Some(row) => (row, false),
            None => {
              let row = tx.query_row(
                &format!(
                  "INSERT INTO audios (verse_id, language, url, duration, format)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   RETURNING {AUDIO_COLS}"
                ),
                rusqlite::params![
                  verse_id,
                  audio.language,
                  audio.url,
                  audio.duration,
                  audio.format,
                ],
                |row| decode_audio(row, 0),
              )?;
              (row, true)
            }
          };
          tx.commit()?;
          Ok(result)
        })
        .await?,
    )
  }

  // ── Unique lookups ────────────────────────────────────────────────────────

  async fn find_language(&self, code: &str) -> Result<Option<Language>> {
    let code = code.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {LANGUAGE_COLS} FROM languages WHERE code = ?1"),
                rusqlite::params![code],
                |row| decode_language(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn get_language(&self, id: i64) -> Result<Option<Language>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {LANGUAGE_COLS} FROM languages WHERE id = ?1"),
                rusqlite::params![id],
                |row| decode_language(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_version(&self, code: &str) -> Result<Option<Version>> {
    let code = code.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {VERSION_COLS} FROM versions WHERE code = ?1"),
                rusqlite::params![code],
                |row| decode_version(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_book(&self, slug: &str) -> Result<Option<Book>> {
    let slug = slug.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {BOOK_COLS} FROM books WHERE slug = ?1"),
                rusqlite::params![slug],
                |row| decode_book(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_chapter(&self, book_id: i64, chapter_num: i64) -> Result<Option<Chapter>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "SELECT {CHAPTER_COLS} FROM chapters WHERE book_id = ?1 AND chapter_num = ?2"
                ),
                rusqlite::params![book_id, chapter_num],
                |row| decode_chapter(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_verse(
    &self,
    version_id:   i64,
    chapter_id:   i64,
    verse_number: i64,
  ) -> Result<Option<Verse>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "SELECT {VERSE_COLS} FROM verses
                   WHERE version_id = ?1 AND chapter_id = ?2 AND verse_number = ?3"
                ),
                rusqlite::params![version_id, chapter_id, verse_number],
                |row| decode_verse(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_verse_at(&self, address: &VerseAddress) -> Result<Option<Verse>> {
    let address = address.clone();
    let verse_cols = qualify("v", VERSE_COLS);

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "SELECT {verse_cols}
                   FROM verses v
                   JOIN versions vr ON vr.id = v.version_id
                   JOIN chapters c  ON c.id  = v.chapter_id
                   JOIN books b     ON b.id  = c.book_id
                   WHERE vr.code = ?1
                     AND b.slug = ?2
                     AND c.chapter_num = ?3
                     AND v.verse_number = ?4"
                ),
                rusqlite::params![
                  address.version_code,
                  address.book_slug,
                  address.chapter_num,
                  address.verse_number,
                ],
                |row| decode_verse(row, 0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  // ── Ordered lists ─────────────────────────────────────────────────────────

  async fn list_versions(&self, language_id: i64) -> Result<Vec<Version>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!(
            "SELECT {VERSION_COLS} FROM versions WHERE language_id = ?1 ORDER BY id"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params![language_id], |row| decode_version(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn list_books(&self) -> Result<Vec<Book>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt =
            conn.prepare(&format!("SELECT {BOOK_COLS} FROM books ORDER BY number, id"))?;
          let rows = stmt
            .query_map([], |row| decode_book(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn list_chapters(&self, book_id: i64) -> Result<Vec<Chapter>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CHAPTER_COLS} FROM chapters WHERE book_id = ?1 ORDER BY chapter_num"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params![book_id], |row| decode_chapter(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn list_verses(&self, version_id: i64, chapter_id: i64) -> Result<Vec<Verse>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!(
            "SELECT {VERSE_COLS} FROM verses
             WHERE version_id = ?1 AND chapter_id = ?2
             ORDER BY verse_number"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params![version_id, chapter_id], |row| decode_verse(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn list_book_verses(&self, version_id: i64, book_id: i64) -> Result<Vec<Verse>> {
    let verse_cols = qualify("v", VERSE_COLS);

    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!(
            "SELECT {verse_cols}
             FROM verses v
             JOIN chapters c ON c.id = v.chapter_id
             WHERE v.version_id = ?1 AND c.book_id = ?2
             ORDER BY c.chapter_num, v.verse_number"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params![version_id, book_id], |row| decode_verse(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn list_audios(&self, verse_ids: &[i64]) -> Result<Vec<Audio>> {
    if verse_ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids = verse_ids.to_vec();

    Ok(
      self
        .conn
        .call(move |conn| {
          // SQLite caps bound parameters per statement; stay well below it.
          let mut out = Vec::with_capacity(ids.len());
          for chunk in ids.chunks(500) {
            let mut stmt = conn.prepare(&format!(
              "SELECT {AUDIO_COLS} FROM audios WHERE verse_id IN ({}) ORDER BY id",
              placeholders(chunk.len())
            ))?;
            let rows = stmt
              .query_map(rusqlite::params_from_iter(chunk.iter()), |row| decode_audio(row, 0))?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            out.extend(rows);
          }
          Ok(out)
        })
        .await?,
    )
  }

  // ── Search & stats ────────────────────────────────────────────────────────

  async fn search_verses(&self, query: &VerseQuery) -> Result<Vec<SearchHit>> {
    let text = query.text.clone();
    let version_id = query.version_id;
    let limit = query.limit.min(SEARCH_RESULT_CAP) as i64;

    let cols = [
      qualify("l", LANGUAGE_COLS),
      qualify("vr", VERSION_COLS),
      qualify("b", BOOK_COLS),
      qualify("c", CHAPTER_COLS),
      qualify("v", VERSE_COLS),
    ]
    .join(", ");

    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!(
            "SELECT {cols}
             FROM verses v
             JOIN versions vr ON vr.id = v.version_id
             JOIN languages l ON l.id  = vr.language_id
             JOIN chapters c  ON c.id  = v.chapter_id
             JOIN books b     ON b.id  = c.book_id
             WHERE {CONTAINS_FN}(v.text, ?1)
               AND (?2 IS NULL OR v.version_id = ?2)
             ORDER BY b.number, c.chapter_num, v.verse_number, vr.id
             LIMIT ?3"
          ))?;

          let rows = stmt
            .query_map(rusqlite::params![text, version_id, limit], |row| {
              Ok(SearchHit {
                language: decode_language(row, 0)?,
                version:  decode_version(row, 3)?,
                book:     decode_book(row, 7)?,
                chapter:  decode_chapter(row, 11)?,
                verse:    decode_verse(row, 14)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn counts(&self) -> Result<StoreCounts> {
    Ok(
      self
        .conn
        .call(|conn| {
          Ok(conn.query_row(
            "SELECT
               (SELECT COUNT(*) FROM languages),
               (SELECT COUNT(*) FROM versions),
               (SELECT COUNT(*) FROM books),
               (SELECT COUNT(*) FROM chapters),
               (SELECT COUNT(*) FROM verses),
               (SELECT COUNT(*) FROM audios)",
            [],
            |row| {
              Ok(StoreCounts {
                languages: row.get(0)?,
                versions:  row.get(1)?,
                books:     row.get(2)?,
                chapters:  row.get(3)?,
                verses:    row.get(4)?,
                audios:    row.get(5)?,
              })
            },
          )?)
        })
        .await?,
    )
  }
}
