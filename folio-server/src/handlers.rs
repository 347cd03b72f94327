/// HTTP handlers for link creation, redirects, health and metrics

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_core::link::validate_url;
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::metrics::{self, RequestTimer, LINKS_CREATED_TOTAL, REDIRECTS_TOTAL};
use crate::models::{extract_url, ShortenResponse};
use crate::AppState;

/// `POST /api/shorten`
pub async fn shorten(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let timer = RequestTimer::start("shorten");
    let response = match shorten_link(&state, &headers, &body).await {
        Ok(created) => Json(created).into_response(),
        Err(e) => e.into_response(),
    };
    timer.finish(response.status().as_u16());
    response
}

async fn shorten_link(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<ShortenResponse, ApiError> {
    state.limiter.check()?;

    let url = extract_url(body)?.ok_or(ApiError::InvalidUrl)?;
    let url = validate_url(&url).map_err(|e| {
        debug!(error = %e, "rejecting shorten request");
        ApiError::InvalidUrl
    })?;

    let shortener = state.shortener.clone();
    let link = tokio::task::spawn_blocking(move || shortener.create(&url))
        .await
        .map_err(|e| {
            error!("Task join error: {}", e);
            ApiError::ShortenFailed
        })?
        .map_err(|e| {
            if e.is_invalid_input() {
                return ApiError::InvalidUrl;
            }
            error!(code = e.code(), error = %e, "failed to store short link");
            ApiError::ShortenFailed
        })?;

    LINKS_CREATED_TOTAL.inc();
    let origin = state.origin(headers);
    info!(id = %link.id, "shortened link");
    Ok(ShortenResponse {
        short_url: format!("{}/shorten/{}", origin, link.id),
        id: link.id.to_string(),
    })
}

/// `GET /shorten/{id}`
pub async fn redirect(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let timer = RequestTimer::start("redirect");
    let response = match resolve_link(&state, id).await {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(e) => e.into_response(),
    };
    timer.finish(response.status().as_u16());
    response
}

/// `GET /shorten/` with no id segment
pub async fn missing_id() -> Response {
    let timer = RequestTimer::start("redirect");
    REDIRECTS_TOTAL.with_label_values(&["missing_id"]).inc();
    let response = ApiError::MissingId.into_response();
    timer.finish(response.status().as_u16());
    response
}

async fn resolve_link(state: &AppState, id: String) -> Result<HeaderValue, ApiError> {
    if id.trim().is_empty() {
        REDIRECTS_TOTAL.with_label_values(&["missing_id"]).inc();
        return Err(ApiError::MissingId);
    }

    let shortener = state.shortener.clone();
    let lookup_id = id.clone();
    let resolved = tokio::task::spawn_blocking(move || shortener.resolve(&lookup_id))
        .await
        .map_err(|e| {
            error!("Task join error: {}", e);
            ApiError::ResolveFailed
        })?
        .map_err(|e| {
            REDIRECTS_TOTAL.with_label_values(&["error"]).inc();
            error!(%id, code = e.code(), error = %e, "failed to resolve short link");
            ApiError::ResolveFailed
        })?;

    let Some(url) = resolved else {
        REDIRECTS_TOTAL.with_label_values(&["not_found"]).inc();
        return Err(ApiError::NotFound);
    };

    REDIRECTS_TOTAL.with_label_values(&["found"]).inc();
    debug!(%id, %url, "redirecting");
    location_header(&url)
}

/// Uses the stored url as-is, falling back to its normalized form when it
/// holds bytes a header cannot carry.
fn location_header(url: &str) -> Result<HeaderValue, ApiError> {
    if let Ok(value) = HeaderValue::from_str(url) {
        return Ok(value);
    }
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| HeaderValue::from_str(parsed.as_str()).ok())
        .ok_or_else(|| {
            error!(%url, "stored url cannot be used as a Location header");
            ApiError::ResolveFailed
        })
}

/// `GET /metrics`
pub async fn metrics_handler() -> String {
    metrics::encode_metrics().unwrap_or_else(|e| {
        error!("Failed to encode metrics: {}", e);
        String::from("# Error encoding metrics\n")
    })
}

/// `GET /health`
pub async fn health_handler() -> &'static str {
    "OK"
}
