//! Required-parameter middleware.
//!
//! Mounted per route with [`axum::routing::MethodRouter::route_layer`], with
//! the list of required names as the middleware state:
//!
//! ```rust,ignore
//! get(handler).route_layer(from_fn_with_state(&["query"][..], require_query))
//! ```

use std::collections::HashMap;

use axum::{
  extract::{Query, RawPathParams, Request, State},
  middleware::Next,
  response::Response,
};

use crate::error::ApiError;

/// Reject the request with 400 unless every named path parameter is present
/// and non-empty.
pub async fn require_path(
  State(required): State<&'static [&'static str]>,
  params: RawPathParams,
  request: Request,
  next: Next,
) -> Result<Response, ApiError> {
  for name in required {
    let present = params
      .iter()
      .any(|(key, value)| key == *name && !value.is_empty());
    if !present {
      return Err(ApiError::Validation(format!("Missing required parameter: {name}")));
    }
  }
  Ok(next.run(request).await)
}

/// Reject the request with 400 unless every named query parameter is present
/// and non-empty.
pub async fn require_query(
  State(required): State<&'static [&'static str]>,
  request: Request,
  next: Next,
) -> Result<Response, ApiError> {
  let Query(query) = Query::<HashMap<String, String>>::try_from_uri(request.uri())
    .map_err(|e| ApiError::Validation(e.body_text()))?;

  for name in required {
    if query.get(*name).is_none_or(|v| v.is_empty()) {
      return Err(ApiError::Validation(format!(
        "Missing required query parameter: {name}"
      )));
    }
  }
  Ok(next.run(request).await)
}
