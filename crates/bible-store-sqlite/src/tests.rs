//! Integration tests for `SqliteStore` against an in-memory database.

use bible_core::{
  model::NewAudio,
  store::{BibleStore, SEARCH_RESULT_CAP, VerseAddress, VerseQuery},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn audio(url: &str) -> NewAudio {
  NewAudio {
    language: "en".into(),
    url:      url.into(),
    duration: Some(4.5),
    format:   Some("mp3".into()),
  }
}

/// One language, one version, Genesis 1:1-3 and John 1:1.
async fn seeded() -> SqliteStore {
  let s = store().await;
  let en = s.upsert_language("en", "English").await.unwrap();
  let kjv = s.upsert_version("KJV", "King James Version", en.id).await.unwrap();

  let john = s.upsert_book("john", "John", 43).await.unwrap();
  let genesis = s.upsert_book("genesis", "Genesis", 1).await.unwrap();

  let gen1 = s.upsert_chapter(genesis.id, 1).await.unwrap();
  s.upsert_verse(kjv.id, gen1.id, 3, "And God said, Let there be light").await.unwrap();
  s.upsert_verse(kjv.id, gen1.id, 1, "In the beginning God created the heaven").await.unwrap();
  s.upsert_verse(kjv.id, gen1.id, 2, "And the earth was without form").await.unwrap();

  let john1 = s.upsert_chapter(john.id, 1).await.unwrap();
  s.upsert_verse(kjv.id, john1.id, 1, "In the beginning was the Word").await.unwrap();
  s
}

// ─── Upserts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_language_keeps_identity_and_updates_name() {
  let s = store().await;
  let first = s.upsert_language("en", "Englsh").await.unwrap();
  let second = s.upsert_language("en", "English").await.unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.name, "English");
  assert_eq!(s.counts().await.unwrap().languages, 1);
}

#[tokio::test]
async fn upsert_version_repoints_language() {
  let s = store().await;
  let en = s.upsert_language("en", "English").await.unwrap();
  let fr = s.upsert_language("fr", "French").await.unwrap();

  let v1 = s.upsert_version("LSG", "Louis Segond", en.id).await.unwrap();
  let v2 = s.upsert_version("LSG", "Louis Segond 1910", fr.id).await.unwrap();

  assert_eq!(v1.id, v2.id);
  assert_eq!(v2.language_id, fr.id);
  assert_eq!(v2.name, "Louis Segond 1910");
}

#[tokio::test]
async fn upsert_chapter_is_idempotent() {
  let s = store().await;
  let book = s.upsert_book("genesis", "Genesis", 1).await.unwrap();
  let a = s.upsert_chapter(book.id, 1).await.unwrap();
  let b = s.upsert_chapter(book.id, 1).await.unwrap();
  assert_eq!(a, b);
  assert_eq!(s.counts().await.unwrap().chapters, 1);
}

#[tokio::test]
async fn upsert_verse_overwrites_text() {
  let s = seeded().await;
  let kjv = s.find_version("KJV").await.unwrap().unwrap();
  let genesis = s.find_book("genesis").await.unwrap().unwrap();
  let ch = s.find_chapter(genesis.id, 1).await.unwrap().unwrap();

  let before = s.find_verse(kjv.id, ch.id, 1).await.unwrap().unwrap();
  let after = s.upsert_verse(kjv.id, ch.id, 1, "revised").await.unwrap();

  assert_eq!(before.id, after.id);
  assert_eq!(after.text, "revised");
  assert_eq!(s.counts().await.unwrap().verses, 4);
}

#[tokio::test]
async fn verse_with_unknown_chapter_is_rejected() {
  let s = seeded().await;
  let kjv = s.find_version("KJV").await.unwrap().unwrap();
  assert!(s.upsert_verse(kjv.id, 9999, 1, "orphan").await.is_err());
}

// ─── Audios ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_audio_inserts_once() {
  let s = seeded().await;
  let verse = s
    .find_verse_at(&VerseAddress {
      version_code: "KJV".into(),
      book_slug:    "john".into(),
      chapter_num:  1,
      verse_number: 1,
    })
    .await
    .unwrap()
    .unwrap();

  let (first, inserted) = s.ensure_audio(verse.id, &audio("https://a/1.mp3")).await.unwrap();
  assert!(inserted);
  let (second, inserted) = s.ensure_audio(verse.id, &audio("https://a/1.mp3")).await.unwrap();
  assert!(!inserted);
  assert_eq!(first.id, second.id);

  let (_, inserted) = s.ensure_audio(verse.id, &audio("https://a/2.mp3")).await.unwrap();
  assert!(inserted);

  let audios = s.list_audios(&[verse.id]).await.unwrap();
  assert_eq!(audios.len(), 2);
  assert_eq!(audios[0].duration, Some(4.5));
  assert_eq!(audios[0].format.as_deref(), Some("mp3"));
}

#[tokio::test]
async fn update_audio_overwrites_existing_row() {
  let s = seeded().await;
  let kjv = s.find_version("KJV").await.unwrap().unwrap();
  let genesis = s.find_book("genesis").await.unwrap().unwrap();
  let ch = s.find_chapter(genesis.id, 1).await.unwrap().unwrap();
  let verse = s.find_verse(kjv.id, ch.id, 1).await.unwrap().unwrap();

  let (created, _) = s.ensure_audio(verse.id, &audio("https://a/old.mp3")).await.unwrap();
  let updated = s
    .update_audio(created.id, &NewAudio { duration: None, ..audio("https://a/new.mp3") })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.verse_id, verse.id);
  assert_eq!(updated.url, "https://a/new.mp3");
  assert_eq!(updated.duration, None);
}

#[tokio::test]
async fn update_audio_missing_returns_none() {
  let s = seeded().await;
  let result = s.update_audio(42, &audio("https://a/x.mp3")).await.unwrap();
  assert!(result.is_none());
  assert_eq!(s.counts().await.unwrap().audios, 0);
}

#[tokio::test]
async fn list_audios_empty_ids() {
  let s = seeded().await;
  assert!(s.list_audios(&[]).await.unwrap().is_empty());
}

// ─── Lookups & ordering ──────────────────────────────────────────────────────

#[tokio::test]
async fn books_are_ordered_by_number() {
  let s = seeded().await;
  let slugs: Vec<_> = s.list_books().await.unwrap().into_iter().map(|b| b.slug).collect();
  assert_eq!(slugs, vec!["genesis", "john"]);
}

#[tokio::test]
async fn verses_are_ordered_by_number() {
  let s = seeded().await;
  let kjv = s.find_version("KJV").await.unwrap().unwrap();
  let genesis = s.find_book("genesis").await.unwrap().unwrap();
  let ch = s.find_chapter(genesis.id, 1).await.unwrap().unwrap();

  let numbers: Vec<_> = s
    .list_verses(kjv.id, ch.id)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.verse_number)
    .collect();
  assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn book_verses_span_chapters_in_order() {
  let s = seeded().await;
  let kjv = s.find_version("KJV").await.unwrap().unwrap();
  let genesis = s.find_book("genesis").await.unwrap().unwrap();
  let ch2 = s.upsert_chapter(genesis.id, 2).await.unwrap();
  s.upsert_verse(kjv.id, ch2.id, 1, "Thus the heavens").await.unwrap();

  let verses = s.list_book_verses(kjv.id, genesis.id).await.unwrap();
  let refs: Vec<_> = verses.iter().map(|v| (v.chapter_id, v.verse_number)).collect();
  let ch1 = s.find_chapter(genesis.id, 1).await.unwrap().unwrap();
  assert_eq!(refs, vec![(ch1.id, 1), (ch1.id, 2), (ch1.id, 3), (ch2.id, 1)]);
}

#[tokio::test]
async fn versions_keep_insertion_order() {
  let s = store().await;
  let en = s.upsert_language("en", "English").await.unwrap();
  s.upsert_version("KJV", "King James Version", en.id).await.unwrap();
  s.upsert_version("ASV", "American Standard Version", en.id).await.unwrap();

  let codes: Vec<_> = s
    .list_versions(en.id)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.code)
    .collect();
  assert_eq!(codes, vec!["KJV", "ASV"]);
}

#[tokio::test]
async fn lookups_miss_cleanly() {
  let s = seeded().await;
  assert!(s.find_language("xx").await.unwrap().is_none());
  assert!(s.get_language(999).await.unwrap().is_none());
  assert!(s.find_version("NOPE").await.unwrap().is_none());
  assert!(s.find_book("tobit").await.unwrap().is_none());
  assert!(
    s.find_verse_at(&VerseAddress {
      version_code: "KJV".into(),
      book_slug:    "john".into(),
      chapter_num:  1,
      verse_number: 99,
    })
    .await
    .unwrap()
    .is_none()
  );
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_is_case_insensitive_and_ordered() {
  let s = seeded().await;
  let hits = s.search_verses(&VerseQuery::new("IN THE BEGINNING")).await.unwrap();

  let refs: Vec<_> = hits
    .iter()
    .map(|h| (h.book.slug.as_str(), h.chapter.chapter_num, h.verse.verse_number))
    .collect();
  assert_eq!(refs, vec![("genesis", 1, 1), ("john", 1, 1)]);
  assert_eq!(hits[0].language.code, "en");
  assert_eq!(hits[0].version.code, "KJV");
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  let de = s.upsert_language("de", "Deutsch").await.unwrap();
  let v = s.upsert_version("LUT", "Luther", de.id).await.unwrap();
  let book = s.upsert_book("johannes", "Johannes", 43).await.unwrap();
  let ch = s.upsert_chapter(book.id, 1).await.unwrap();
  s.upsert_verse(v.id, ch.id, 1, "IM ANFANG WAR DAS WORT, ÜBER ALLES").await.unwrap();

  let hits = s.search_verses(&VerseQuery::new("über")).await.unwrap();
  assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn search_filters_by_version() {
  let s = seeded().await;
  let en = s.find_language("en").await.unwrap().unwrap();
  let asv = s.upsert_version("ASV", "American Standard Version", en.id).await.unwrap();
  let john = s.find_book("john").await.unwrap().unwrap();
  let ch = s.find_chapter(john.id, 1).await.unwrap().unwrap();
  s.upsert_verse(asv.id, ch.id, 1, "In the beginning was the Word").await.unwrap();

  let all = s.search_verses(&VerseQuery::new("beginning")).await.unwrap();
  assert_eq!(all.len(), 3);

  let query = VerseQuery { version_id: Some(asv.id), ..VerseQuery::new("beginning") };
  let only_asv = s.search_verses(&query).await.unwrap();
  assert_eq!(only_asv.len(), 1);
  assert_eq!(only_asv[0].version.code, "ASV");
}

#[tokio::test]
async fn search_is_capped() {
  let s = store().await;
  let en = s.upsert_language("en", "English").await.unwrap();
  let v = s.upsert_version("KJV", "King James Version", en.id).await.unwrap();
  let book = s.upsert_book("psalms", "Psalms", 19).await.unwrap();
  let ch = s.upsert_chapter(book.id, 119).await.unwrap();
  for n in 1..=(SEARCH_RESULT_CAP as i64 + 20) {
    s.upsert_verse(v.id, ch.id, n, "Blessed are the undefiled").await.unwrap();
  }

  let query = VerseQuery { limit: 1000, ..VerseQuery::new("blessed") };
  let hits = s.search_verses(&query).await.unwrap();
  assert_eq!(hits.len(), SEARCH_RESULT_CAP);
  assert_eq!(hits[0].verse.verse_number, 1);
}

#[tokio::test]
async fn search_without_match_is_empty() {
  let s = seeded().await;
  assert!(s.search_verses(&VerseQuery::new("zebra")).await.unwrap().is_empty());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopen_file_store_keeps_rows() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bible.db");

  let s = SqliteStore::open(&path).await.unwrap();
  s.upsert_language("en", "English").await.unwrap();
  s.close().await.unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.find_language("en").await.unwrap().unwrap().name, "English");
}
