//! APOD API client with admission control and outcome classification.
//!
//! # Responsibilities
//! - Build the upstream query from a validated date range
//! - Hold a gate slot for the duration of each HTTP exchange
//! - Classify transport failures and error statuses
//! - Decode the body in the shape implied by the range

use std::time::Instant;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::StatusCode;

use crate::apod::gate::ConcurrencyGate;
use crate::apod::types::{parse_urls, ApodError, ApodResult};
use crate::apod::ImageSource;
use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::validation::range::{DateRange, DATE_FORMAT};

/// Path of the picture-of-the-day resource under the configured endpoint.
pub const APOD_PATH: &str = "/planetary/apod";

/// Upstream client shared by all inbound requests.
///
/// Stateless apart from the gate; clones share the same gate and connection pool.
#[derive(Clone)]
pub struct ApodClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    gate: ConcurrencyGate,
}

impl ApodClient {
    /// Create a client with its own HTTP connection pool and per-call timeout.
    pub fn new(config: &UpstreamConfig) -> ApodResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("apod-fetcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApodError::Transport)?;

        Ok(Self::with_http_client(config, http))
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The caller's client is used as-is, including its timeout.
    pub fn with_http_client(config: &UpstreamConfig, http: reqwest::Client) -> Self {
        let url = format!("{}{}", config.endpoint.trim_end_matches('/'), APOD_PATH);

        tracing::info!(
            url = %url,
            concurrent_requests = config.concurrent_requests,
            timeout_secs = config.timeout_secs,
            "APOD client initialized"
        );

        Self {
            http,
            url,
            api_key: config.api_key.clone(),
            gate: ConcurrencyGate::new(config.concurrent_requests),
        }
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters for `range`. Date bounds appear only when supplied.
    pub fn query(&self, range: &DateRange) -> Vec<(&'static str, String)> {
        let mut query = vec![("api_key", self.api_key.clone())];
        if let Some(start) = range.start() {
            query.push(("start_date", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = range.end() {
            query.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }
        query
    }

    /// Fetch image URLs for `range`.
    ///
    /// Returns either the URLs in upstream order or exactly one classified error.
    pub async fn fetch_images(&self, range: &DateRange) -> ApodResult<Vec<String>> {
        let started = Instant::now();

        let result = self.exchange(range).await.and_then(|(status, body)| {
            classify(status, &body)?;
            parse_urls(&body, range.shape())
        });

        match &result {
            Ok(urls) => {
                tracing::debug!(count = urls.len(), "Upstream returned images");
                metrics::record_upstream("ok", started);
            }
            Err(ApodError::Parse(e)) => {
                tracing::warn!(error = %e, shape = ?range.shape(), "Unexpected upstream body");
                metrics::record_upstream("parse", started);
            }
            Err(e) => metrics::record_upstream(e.outcome(), started),
        }

        result
    }

    /// Perform the HTTP exchange while holding a gate slot.
    ///
    /// The slot is released when this returns, on every path.
    async fn exchange(&self, range: &DateRange) -> ApodResult<(StatusCode, Bytes)> {
        let _permit = self.gate.acquire().await.map_err(|_| {
            tracing::error!("Concurrency gate closed");
            ApodError::GateClosed
        })?;

        let response = self
            .http
            .get(&self.url)
            .query(&self.query(range))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok((status, body))
    }
}

#[async_trait]
impl ImageSource for ApodClient {
    async fn fetch_images(&self, range: &DateRange) -> ApodResult<Vec<String>> {
        ApodClient::fetch_images(self, range).await
    }
}

fn transport_error(e: reqwest::Error) -> ApodError {
    // without_url keeps the api_key out of the logs
    let e = e.without_url();
    tracing::error!(error = %e, timeout = e.is_timeout(), connect = e.is_connect(), "Upstream transport failure");
    ApodError::Transport(e)
}

/// Map an upstream status to an error. 429 wins over every other rule.
fn classify(status: StatusCode, body: &[u8]) -> ApodResult<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(status = status.as_u16(), "Upstream rate limit exceeded");
        return Err(ApodError::RateLimited);
    }

    if status.as_u16() >= 400 {
        tracing::warn!(
            status = status.as_u16(),
            body = %String::from_utf8_lossy(body),
            "Upstream request failed"
        );
        return Err(ApodError::RequestFailed);
    }

    Ok(())
}
