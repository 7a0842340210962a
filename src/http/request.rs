//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Extract the picture query parameters
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A query parameter counts only if it appears exactly once

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Produces a fresh UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID from the headers, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Raw `start_date` / `end_date` values. Empty means not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PicturesQuery {
    pub start_date: String,
    pub end_date: String,
}

impl PicturesQuery {
    /// Parse a raw query string. Repeated parameters are treated as absent.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut start_dates = Vec::new();
        let mut end_dates = Vec::new();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "start_date" => start_dates.push(value.into_owned()),
                "end_date" => end_dates.push(value.into_owned()),
                _ => {}
            }
        }

        Self {
            start_date: single(start_dates),
            end_date: single(end_dates),
        }
    }
}

fn single(mut values: Vec<String>) -> String {
    if values.len() == 1 {
        values.pop().unwrap_or_default()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both() {
        let q = PicturesQuery::parse(Some("start_date=2021-01-01&end_date=2021-03-01"));
        assert_eq!(q.start_date, "2021-01-01");
        assert_eq!(q.end_date, "2021-03-01");
    }

    #[test]
    fn test_parse_none() {
        assert_eq!(PicturesQuery::parse(None), PicturesQuery::default());
        assert_eq!(PicturesQuery::parse(Some("foo=bar")), PicturesQuery::default());
    }

    #[test]
    fn test_repeated_param_is_absent() {
        let q = PicturesQuery::parse(Some("start_date=2021-01-01&start_date=2021-01-02&end_date=2021-03-01"));
        assert_eq!(q.start_date, "");
        assert_eq!(q.end_date, "2021-03-01");
    }

    #[test]
    fn test_percent_decoding() {
        let q = PicturesQuery::parse(Some("start_date=2021%2D01%2D01"));
        assert_eq!(q.start_date, "2021-01-01");
    }

    #[test]
    fn test_request_id_generated() {
        let req = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());

        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(request_id(&headers), "abc");
    }
}
