//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": ...}`, plus `details` for upstream
//! failures. Internal causes are logged, never returned.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use orbis_core::RefreshError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(&'static str),

  #[error("upstream unavailable: {details}")]
  UpstreamUnavailable { details: String },

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Internal(Box::new(e))
  }
}

impl<S, D> From<RefreshError<S, D>> for ApiError
where
  S: std::error::Error + Send + Sync + 'static,
  D: std::error::Error + Send + Sync + 'static,
{
  fn from(e: RefreshError<S, D>) -> Self {
    match e {
      RefreshError::Upstream { which, error } => ApiError::UpstreamUnavailable {
        details: format!("Could not fetch data from {which} API: {error}"),
      },
      RefreshError::Store(e) => ApiError::internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::UpstreamUnavailable { details } => {
        tracing::warn!(%details, "refresh aborted");
        (
          StatusCode::SERVICE_UNAVAILABLE,
          Json(json!({
            "error":   "External data source unavailable",
            "details": details,
          })),
        )
          .into_response()
      }
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "internal error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "Internal server error" })),
        )
          .into_response()
      }
    }
  }
}
