//! Router tests against an in-memory `SqliteStore`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use bible_core::{model::NewAudio, store::BibleStore};
use bible_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{ApiOptions, api_router};

/// English/KJV with Genesis 1:1-2 and John 1:1; a second language without
/// any version; one audio on Genesis 1:1.
async fn seeded() -> Arc<SqliteStore> {
  let s = SqliteStore::open_in_memory().await.unwrap();
  let en = s.upsert_language("en", "English").await.unwrap();
  s.upsert_language("xx", "Empty").await.unwrap();
  let kjv = s.upsert_version("KJV", "King James Version", en.id).await.unwrap();
  s.upsert_version("ASV", "American Standard Version", en.id).await.unwrap();

  let john = s.upsert_book("john", "John", 43).await.unwrap();
  let genesis = s.upsert_book("genesis", "Genesis", 1).await.unwrap();

  let gen1 = s.upsert_chapter(genesis.id, 1).await.unwrap();
  let v1 = s
    .upsert_verse(kjv.id, gen1.id, 1, "In the beginning God created the heaven and the earth.")
    .await
    .unwrap();
  s.upsert_verse(kjv.id, gen1.id, 2, "And the earth was without form, and void.").await.unwrap();
  let john1 = s.upsert_chapter(john.id, 1).await.unwrap();
  s.upsert_verse(kjv.id, john1.id, 1, "In the beginning was the Word.").await.unwrap();

  s.ensure_audio(v1.id, &NewAudio {
    language: "en".into(),
    url:      "https://example.com/audio/genesis/1/1.mp3".into(),
    duration: Some(7.25),
    format:   Some("mp3".into()),
  })
  .await
  .unwrap();

  Arc::new(s)
}

async fn get(store: Arc<SqliteStore>, options: ApiOptions, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let resp = api_router(store, options).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_ok(uri: &str) -> Value {
  let (status, body) = get(seeded().await, ApiOptions::default(), uri).await;
  assert_eq!(status, StatusCode::OK, "{uri}: {body}");
  body
}

fn assert_envelope(body: &Value, code: u16) {
  assert_eq!(body["status"], "error");
  assert_eq!(body["statusCode"], code);
  assert!(body["message"].is_string());
  assert!(body["timestamp"].is_string());
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn verse_returns_text_and_audios() {
  let body = get_ok("/bible/version/KJV/book/genesis/chapter/1/verse/1").await;

  assert_eq!(body["language"], "en");
  assert_eq!(body["languageName"], "English");
  assert_eq!(body["version"], "KJV");
  assert_eq!(body["versionName"], "King James Version");
  assert_eq!(body["book"]["slug"], "genesis");
  assert_eq!(body["book"]["number"], 1);
  assert_eq!(body["chapter"]["chapterNum"], 1);
  assert_eq!(body["verse"]["verseNumber"], 1);
  assert_eq!(
    body["verse"]["text"],
    "In the beginning God created the heaven and the earth."
  );

  let audios = body["verse"]["audios"].as_array().unwrap();
  assert_eq!(audios.len(), 1);
  assert_eq!(audios[0]["url"], "https://example.com/audio/genesis/1/1.mp3");
  assert_eq!(audios[0]["duration"], 7.25);
  assert_eq!(audios[0]["format"], "mp3");
}

#[tokio::test]
async fn chapter_lists_verses_in_order() {
  let body = get_ok("/bible/version/KJV/book/genesis/chapter/1").await;

  assert_eq!(body["book"]["name"], "Genesis");
  assert!(body["book"].get("chapters").is_none());
  let numbers: Vec<_> = body["chapter"]["verses"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v["verseNumber"].as_i64().unwrap())
    .collect();
  assert_eq!(numbers, vec![1, 2]);
  assert_eq!(body["chapter"]["verses"][1]["audios"], Value::Array(vec![]));
}

#[tokio::test]
async fn book_nests_chapters() {
  let body = get_ok("/bible/version/KJV/book/john").await;
  assert_eq!(body["book"]["slug"], "john");
  assert_eq!(body["book"]["chapters"][0]["chapterNum"], 1);
  assert_eq!(
    body["book"]["chapters"][0]["verses"][0]["text"],
    "In the beginning was the Word."
  );
}

#[tokio::test]
async fn version_tree_orders_books_by_number() {
  let body = get_ok("/bible/version/KJV").await;
  let slugs: Vec<_> = body["books"]
    .as_array()
    .unwrap()
    .iter()
    .map(|b| b["slug"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(slugs, vec!["genesis", "john"]);
}

#[tokio::test]
async fn language_uses_first_version() {
  for uri in ["/bible/language/en", "/bible/en"] {
    let body = get_ok(uri).await;
    assert_eq!(body["version"], "KJV", "{uri}");
    assert_eq!(body["books"][0]["chapters"][0]["verses"].as_array().unwrap().len(), 2);
  }
}

#[tokio::test]
async fn unknown_keys_return_404_envelope() {
  for uri in [
    "/bible/language/zz",
    "/bible/xx",
    "/bible/version/NOPE",
    "/bible/version/KJV/book/tobit",
    "/bible/version/KJV/book/genesis/chapter/50",
    "/bible/version/KJV/book/genesis/chapter/1/verse/99",
    "/bible/search?query=beginning&versionCode=NOPE",
  ] {
    let (status, body) = get(seeded().await, ApiOptions::default(), uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert_envelope(&body, 404);
  }
}

#[tokio::test]
async fn non_numeric_numbers_return_400() {
  for uri in [
    "/bible/version/KJV/book/genesis/chapter/abc",
    "/bible/version/KJV/book/genesis/chapter/abc/verse/1",
    "/bible/version/KJV/book/genesis/chapter/1/verse/abc",
  ] {
    let (status, body) = get(seeded().await, ApiOptions::default(), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert_envelope(&body, 400);
    assert!(body["message"].as_str().unwrap().contains("must be a valid number"));
  }
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_requires_query() {
  for uri in ["/bible/search", "/bible/search?query="] {
    let (status, body) = get(seeded().await, ApiOptions::default(), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert_envelope(&body, 400);
    assert_eq!(body["message"], "Missing required query parameter: query");
  }
}

#[tokio::test]
async fn search_matches_case_insensitively() {
  let body = get_ok("/bible/search?query=BEGINNING").await;

  let results = body["results"].as_array().unwrap();
  assert_eq!(body["query"], "BEGINNING");
  assert_eq!(body["count"], results.len());
  assert_eq!(results.len(), 2);
  for r in results {
    let text = r["verse"]["text"].as_str().unwrap().to_lowercase();
    assert!(text.contains("beginning"));
  }
  assert_eq!(results[0]["book"]["slug"], "genesis");
  assert_eq!(results[0]["verse"]["audios"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_filters_by_version_code() {
  let body = get_ok("/bible/search?query=beginning&versionCode=ASV").await;
  assert_eq!(body["count"], 0);
  assert_eq!(body["results"], Value::Array(vec![]));
}

// ─── Misc routes ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unmatched_route_returns_404_envelope() {
  let (status, body) = get(seeded().await, ApiOptions::default(), "/nope/at/all").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_envelope(&body, 404);
  assert_eq!(body["message"], "Resource not found - /nope/at/all");
  assert!(body.get("details").is_none());
}

#[tokio::test]
async fn undecodable_path_segment_returns_400_envelope() {
  let (status, body) = get(seeded().await, ApiOptions::default(), "/bible/version/%FF").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_envelope(&body, 400);
  assert!(body["message"].as_str().unwrap().contains("versionCode"), "{body}");
}

#[tokio::test]
async fn malformed_query_string_returns_400_envelope() {
  let (status, body) =
    get(seeded().await, ApiOptions::default(), "/bible/search?query=a&query=b").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_envelope(&body, 400);
}

#[tokio::test]
async fn wrong_method_returns_405_envelope() {
  let req = Request::builder()
    .method(Method::POST)
    .uri("/bible/search?query=a")
    .body(Body::empty())
    .unwrap();
  let resp = api_router(seeded().await, ApiOptions::default()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  assert!(resp.headers().contains_key(header::ALLOW));

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_envelope(&body, 405);
  assert_eq!(body["message"], "Method Not Allowed");
}

#[tokio::test]
async fn details_are_exposed_outside_production() {
  let options = ApiOptions { expose_error_details: true };
  let (status, body) = get(seeded().await, options, "/bible/version/NOPE").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["details"][0], "Bible data for version 'NOPE' not found");
}

#[tokio::test]
async fn index_and_health() {
  let body = get_ok("/").await;
  assert_eq!(body["endpoints"]["search"], "/bible/search");

  let body = get_ok("/health").await;
  assert_eq!(body["status"], "ok");
}
