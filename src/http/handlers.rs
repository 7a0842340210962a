//! Route handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::{request_id, PicturesQuery};
use crate::http::response::{ApiError, PicturesResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::validation::DateRange;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /pictures?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
pub async fn pictures(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    let started = Instant::now();
    let request_id = request_id(&headers);
    let query = PicturesQuery::parse(raw.as_deref());

    tracing::debug!(
        request_id = %request_id,
        start_date = %query.start_date,
        end_date = %query.end_date,
        "Fetching pictures"
    );

    let response = match fetch(&state, &query).await {
        Ok(urls) => (StatusCode::OK, Json(PicturesResponse::urls(urls))).into_response(),
        Err(e) => {
            tracing::info!(
                request_id = %request_id,
                kind = ?e.kind(),
                error = %e,
                "Pictures request failed"
            );
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), started);
    response
}

/// Validate, then run the upstream call on its own task.
///
/// The task is detached: if the caller disconnects or the deadline passes,
/// the upstream call still runs to completion and releases its gate slot.
async fn fetch(state: &AppState, query: &PicturesQuery) -> Result<Vec<String>, ApiError> {
    let range = DateRange::validate(&query.start_date, &query.end_date)?;

    let source = Arc::clone(&state.source);
    let task = tokio::spawn(async move { source.fetch_images(&range).await });

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(ApiError::Timeout),
    }
}
