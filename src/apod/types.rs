//! Upstream API types and error definitions.

use serde::Deserialize;
use thiserror::Error;

use crate::validation::ResponseShape;

/// The part of an APOD entry this service uses. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    /// Missing `url` reads as an empty string.
    #[serde(default)]
    pub url: String,
}

/// Client-visible class of a failure, used to pick the inbound status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    RateLimited,
    UpstreamFailed,
    ParseFailure,
}

/// Errors that can occur while fetching images upstream.
///
/// `Display` is safe to show to callers: status codes, bodies and transport
/// details stay in the logs and the `source()` chain.
#[derive(Debug, Error)]
pub enum ApodError {
    /// Upstream answered 429.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Upstream answered with another 4xx/5xx status.
    #[error("request to upstream API failed")]
    RequestFailed,

    /// Timeout, connection refused, DNS failure or a broken body stream.
    #[error("request to upstream API failed")]
    Transport(#[source] reqwest::Error),

    /// Body did not decode in the expected shape.
    #[error("couldn't parse response from upstream API")]
    Parse(#[source] serde_json::Error),

    /// The concurrency gate was closed.
    #[error("request to upstream API failed")]
    GateClosed,
}

impl ApodError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApodError::RateLimited => ErrorKind::RateLimited,
            ApodError::RequestFailed | ApodError::Transport(_) | ApodError::GateClosed => {
                ErrorKind::UpstreamFailed
            }
            ApodError::Parse(_) => ErrorKind::ParseFailure,
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApodError::RateLimited => "rate_limited",
            ApodError::RequestFailed => "request_failed",
            ApodError::Transport(_) | ApodError::GateClosed => "transport",
            ApodError::Parse(_) => "parse",
        }
    }
}

/// Result type for upstream operations.
pub type ApodResult<T> = Result<T, ApodError>;

/// Decode a response body into image URLs, in upstream order.
///
/// The shape is decided by the request, never guessed from the body, so a
/// one-element array is not mistaken for a single object.
pub fn parse_urls(body: &[u8], shape: ResponseShape) -> ApodResult<Vec<String>> {
    match shape {
        ResponseShape::Single => {
            let object: serde_json::Map<String, serde_json::Value> =
                serde_json::from_slice(body).map_err(ApodError::Parse)?;
            let record: ImageRecord = serde_json::from_value(serde_json::Value::Object(object))
                .map_err(ApodError::Parse)?;
            Ok(vec![record.url])
        }
        ResponseShape::Series => {
            let records: Vec<ImageRecord> =
                serde_json::from_slice(body).map_err(ApodError::Parse)?;
            Ok(records.into_iter().map(|r| r.url).collect())
        }
    }
}
