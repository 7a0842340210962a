//! Response envelope and error-to-status mapping.
//!
//! # Design Decisions
//! - One JSON envelope for success and failure; `urls` and `error` are
//!   mutually exclusive and omitted when empty
//! - Status codes are chosen from the error kind only

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::apod::{ApodError, ErrorKind};
use crate::validation::RangeError;

/// Body of every `/pictures` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicturesResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PicturesResponse {
    pub fn urls(urls: Vec<String>) -> Self {
        Self { urls, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            urls: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Anything that can fail a `/pictures` request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] RangeError),

    #[error(transparent)]
    Upstream(#[from] ApodError),

    /// The upstream call did not finish within the inbound deadline.
    #[error("request to upstream API timed out")]
    Timeout,

    /// The detached upstream task panicked or was cancelled.
    #[error("request to upstream API failed")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Upstream(e) => e.kind(),
            ApiError::Timeout | ApiError::Task(_) => ErrorKind::UpstreamFailed,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::UpstreamFailed | ErrorKind::ParseFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(PicturesResponse::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let ok = serde_json::to_string(&PicturesResponse::urls(vec!["xyz".into()])).unwrap();
        assert_eq!(ok, r#"{"urls":["xyz"]}"#);

        let empty = serde_json::to_string(&PicturesResponse::urls(Vec::new())).unwrap();
        assert_eq!(empty, "{}");

        let err = serde_json::to_string(&PicturesResponse::error("rate limit exceeded")).unwrap();
        assert_eq!(err, r#"{"error":"rate limit exceeded"}"#);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(RangeError::EndWithoutStart).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ApodError::RateLimited).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::from(ApodError::RequestFailed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ApodError::GateClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Timeout.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_passes_through() {
        let err = ApiError::from(RangeError::StartAfterEnd);
        assert_eq!(err.to_string(), "`start_date` must be before `end_date`");
    }
}
