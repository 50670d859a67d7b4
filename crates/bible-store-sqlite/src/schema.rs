//! SQL schema for the Bible SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS languages (
    id    INTEGER PRIMARY KEY,
    code  TEXT NOT NULL UNIQUE,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS versions (
    id           INTEGER PRIMARY KEY,
    code         TEXT NOT NULL UNIQUE,
    name         TEXT NOT NULL,
    language_id  INTEGER NOT NULL REFERENCES languages(id)
);

-- Books are shared by every version.
CREATE TABLE IF NOT EXISTS books (
    id      INTEGER PRIMARY KEY,
    slug    TEXT NOT NULL UNIQUE,
    name    TEXT NOT NULL,
    number  INTEGER NOT NULL      -- canonical ordering position
);

CREATE TABLE IF NOT EXISTS chapters (
    id           INTEGER PRIMARY KEY,
    book_id      INTEGER NOT NULL REFERENCES books(id),
    chapter_num  INTEGER NOT NULL,
    UNIQUE (book_id, chapter_num)
);

CREATE TABLE IF NOT EXISTS verses (
    id            INTEGER PRIMARY KEY,
    chapter_id    INTEGER NOT NULL REFERENCES chapters(id),
    version_id    INTEGER NOT NULL REFERENCES versions(id),
    verse_number  INTEGER NOT NULL,
    text          TEXT NOT NULL,
    UNIQUE (version_id, chapter_id, verse_number)
);

CREATE TABLE IF NOT EXISTS audios (
    id        INTEGER PRIMARY KEY,
    verse_id  INTEGER NOT NULL REFERENCES verses(id),
    language  TEXT NOT NULL,
    url       TEXT NOT NULL,
    duration  REAL,                -- seconds
    format    TEXT
);

CREATE INDEX IF NOT EXISTS versions_language_idx ON versions(language_id);
CREATE INDEX IF NOT EXISTS verses_chapter_idx    ON verses(chapter_id, version_id);
CREATE INDEX IF NOT EXISTS audios_verse_idx      ON audios(verse_id, language, url);

PRAGMA user_version = 1;
";
