//! Handler for `GET /bible/search`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use bible_core::store::{BibleStore, SEARCH_RESULT_CAP, VerseQuery};
use serde::Deserialize;

use crate::{
  error::ApiError,
  views::{BookRef, ChapterRef, Edition, SearchBody, VerseBody, audios_by_verse, verse_json},
};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  /// Case-insensitive substring matched against verse text.
  pub query:        Option<String>,
  /// Restrict matches to one version.
  pub version_code: Option<String>,
}

/// `GET /bible/search?query=...[&versionCode=...]`
///
/// At most [`SEARCH_RESULT_CAP`] verses, ordered by book, chapter and verse.
pub async fn handler<S: BibleStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchBody>, ApiError> {
  let text = params
    .query
    .filter(|q| !q.is_empty())
    .ok_or_else(|| ApiError::Validation("Search query is required".into()))?;

  let version_id = match params.version_code.as_deref().filter(|c| !c.is_empty()) {
    None => None,
    Some(code) => {
      let version = store
        .find_version(code)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| ApiError::NotFound(format!("Version '{code}' not found")))?;
      Some(version.id)
    }
  };

  let query = VerseQuery { version_id, limit: SEARCH_RESULT_CAP, ..VerseQuery::new(&text) };
  let hits = store.search_verses(&query).await.map_err(ApiError::store)?;

  let verses: Vec<_> = hits.iter().map(|h| h.verse.clone()).collect();
  let mut audios = audios_by_verse(store.as_ref(), &verses).await?;

  let results: Vec<VerseBody> = hits
    .into_iter()
    .map(|hit| VerseBody {
      edition: Edition::new(&hit.language, &hit.version),
      book:    BookRef::from(&hit.book),
      chapter: ChapterRef { chapter_num: hit.chapter.chapter_num },
      verse:   verse_json(hit.verse, &mut audios),
    })
    .collect();

  Ok(Json(SearchBody { query: text, count: results.len(), results }))
}
