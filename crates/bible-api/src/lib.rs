//! JSON REST API for Bible texts and audio.
//!
//! Exposes an axum [`Router`] backed by any [`bible_core::store::BibleStore`].
//! TLS, CORS and request logging are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = bible_api::api_router(store.clone(), ApiOptions::default());
//! ```

pub mod bible;
pub mod error;
pub mod search;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::{Json, Router, middleware::from_fn_with_state, routing::get};
use bible_core::store::BibleStore;
use serde_json::{Value, json};

pub use error::ApiError;
use validation::{require_path, require_query};

/// Behaviour switches that do not depend on the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOptions {
  /// Include the error source chain as `details` in error envelopes.
  /// Off in production.
  pub expose_error_details: bool,
}

const LANGUAGE_PARAMS: &[&str] = &["languageCode"];
const VERSION_PARAMS: &[&str] = &["versionCode"];
const BOOK_PARAMS: &[&str] = &["versionCode", "bookSlug"];
const CHAPTER_PARAMS: &[&str] = &["versionCode", "bookSlug", "chapterNum"];
const VERSE_PARAMS: &[&str] = &["versionCode", "bookSlug", "chapterNum", "verseNum"];
const SEARCH_PARAMS: &[&str] = &["query"];

/// Build a fully-materialised API router for `store`.
///
/// Unmatched paths get a 404 envelope; every error response passes through
/// [`error::error_envelope`].
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: BibleStore + 'static,
{
  let bible = Router::new()
    .route(
      "/bible/search",
      get(search::handler::<S>).route_layer(from_fn_with_state(SEARCH_PARAMS, require_query)),
    )
    .route(
      "/bible/language/{languageCode}",
      get(bible::by_language::<S>)
        .route_layer(from_fn_with_state(LANGUAGE_PARAMS, require_path)),
    )
    .route(
      "/bible/version/{versionCode}",
      get(bible::by_version::<S>).route_layer(from_fn_with_state(VERSION_PARAMS, require_path)),
    )
    .route(
      "/bible/version/{versionCode}/book/{bookSlug}",
      get(bible::book::<S>).route_layer(from_fn_with_state(BOOK_PARAMS, require_path)),
    )
    .route(
      "/bible/version/{versionCode}/book/{bookSlug}/chapter/{chapterNum}",
      get(bible::chapter::<S>).route_layer(from_fn_with_state(CHAPTER_PARAMS, require_path)),
    )
    .route(
      "/bible/version/{versionCode}/book/{bookSlug}/chapter/{chapterNum}/verse/{verseNum}",
      get(bible::verse::<S>).route_layer(from_fn_with_state(VERSE_PARAMS, require_path)),
    )
    // Legacy alias; static segments above take precedence.
    .route(
      "/bible/{languageCode}",
      get(bible::by_language::<S>)
        .route_layer(from_fn_with_state(LANGUAGE_PARAMS, require_path)),
    );

  Router::new()
    .route("/", get(index))
    .route("/health", get(health))
    .merge(bible)
    .fallback(error::not_found)
    .with_state(store)
    .layer(from_fn_with_state(options, error::error_envelope))
}

/// `GET /`
async fn index() -> Json<Value> {
  Json(json!({
    "message": "Welcome to the Bible API",
    "version": env!("CARGO_PKG_VERSION"),
    "endpoints": {
      "bible":    "/bible",
      "search":   "/bible/search",
      "language": "/bible/language/{languageCode}",
      "version":  "/bible/version/{versionCode}",
      "book":     "/bible/version/{versionCode}/book/{bookSlug}",
      "chapter":  "/bible/version/{versionCode}/book/{bookSlug}/chapter/{chapterNum}",
      "verse":    "/bible/version/{versionCode}/book/{bookSlug}/chapter/{chapterNum}/verse/{verseNum}",
    }
  }))
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests;
