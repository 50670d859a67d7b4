//! API error type, the uniform error envelope, and the terminal error
//! middleware.
//!
//! Handlers return [`ApiError`]; its [`IntoResponse`] impl renders the
//! envelope without details and stashes an [`ErrorReport`] in the response
//! extensions. [`error_envelope`] picks the report up, logs it with the
//! request line, and re-renders with `details` when the API is not running in
//! production mode. Error responses produced outside the handlers, such as
//! extractor rejections and `405 Method Not Allowed`, carry no report and are
//! rewrapped in the envelope from their status and plain-text body.

use std::error::Error as StdError;

use axum::{
  Json,
  extract::{Request, State},
  body::to_bytes,
  http::{StatusCode, Uri, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::ApiOptions;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A missing or malformed request parameter.
  #[error("{0}")]
  Validation(String),

  /// A natural-key lookup found nothing.
  #[error("{0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
  pub status:      &'static str,
  pub status_code: u16,
  pub message:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details:     Option<Vec<String>>,
  pub timestamp:   DateTime<Utc>,
}

/// What [`error_envelope`] needs to log and re-render a failed response.
#[derive(Debug, Clone)]
pub struct ErrorReport {
  pub status:  StatusCode,
  pub message: String,
  /// Display of the error followed by each of its sources.
  pub chain:   Vec<String>,
}

impl ErrorReport {
  fn from_error(status: StatusCode, err: &(dyn StdError + 'static)) -> Self {
    let chain = std::iter::successors(Some(err), |&e| e.source())
      .map(ToString::to_string)
      .collect();
    Self { status, message: err.to_string(), chain }
  }

  fn render(&self, with_details: bool) -> Response {
    let envelope = ErrorEnvelope {
      status:      "error",
      status_code: self.status.as_u16(),
      message:     self.message.clone(),
      details:     with_details.then(|| self.chain.clone()),
      timestamp:   Utc::now(),
    };
    let mut response = (self.status, Json(envelope)).into_response();
    response.extensions_mut().insert(self.clone());
    response
  }
}

/// Upper bound on a plain-text rejection body read back into a message.
const REJECTION_BODY_LIMIT: usize = 16 * 1024;

impl ErrorReport {
  /// Build a report for an error response rendered by axum itself.
  async fn from_rejection(response: Response) -> (Self, Option<header::HeaderValue>) {
    let status = response.status();
    let allow = response.headers().get(header::ALLOW).cloned();
    let body = to_bytes(response.into_body(), REJECTION_BODY_LIMIT)
      .await
      .unwrap_or_default();
    let text = String::from_utf8_lossy(&body).trim().to_owned();
    let message = if text.is_empty() {
      status.canonical_reason().unwrap_or("Request failed").to_owned()
    } else {
      text
    };
    let report = Self { status, message: message.clone(), chain: vec![message] };
    (report, allow)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    ErrorReport::from_error(self.status(), &self).render(false)
  }
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// Terminal error handler, layered around the whole router.
pub async fn error_envelope(
  State(options): State<ApiOptions>,
  request: Request,
  next: Next,
) -> Response {
  let method = request.method().clone();
  let uri = request.uri().clone();

  let response = next.run(request).await;
  let status = response.status();
  let existing = response.extensions().get::<ErrorReport>().cloned();
  let (report, rendered, allow) = match existing {
    Some(report) => (report, Some(response), None),
    None if status.is_client_error() || status.is_server_error() => {
      let (report, allow) = ErrorReport::from_rejection(response).await;
      (report, None, allow)
    }
    None => return response,
  };

  tracing::error!(
    %method,
    %uri,
    status = report.status.as_u16(),
    "{}",
    report.message
  );
  for cause in report.chain.iter().skip(1) {
    tracing::debug!(%cause, "caused by");
  }

  match rendered {
    Some(response) if !options.expose_error_details => response,
    _ => {
      let mut response = report.render(options.expose_error_details);
      if let Some(allow) = allow {
        response.headers_mut().insert(header::ALLOW, allow);
      }
      response
    }
  }
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
  ApiError::NotFound(format!("Resource not found - {uri}"))
}
