/// Folio short-link HTTP server
///
/// Exposes link creation and redirects for the portfolio desktop's Shorten
/// window, plus health and Prometheus endpoints.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;

use axum::{
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use folio_core::{LinkStore, LogStore, MemoryStore, Shortener};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::ServerConfig;
pub use error::ApiError;
pub use rate_limit::RateLimiter;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub shortener: Shortener,
    pub limiter: RateLimiter,
    public_base_url: Option<String>,
    fallback_origin: String,
}

impl AppState {
    pub fn new(shortener: Shortener, config: &ServerConfig) -> Self {
        Self {
            shortener,
            limiter: RateLimiter::new(config.shorten_rps),
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|base| base.trim_end_matches('/').to_string()),
            fallback_origin: config.fallback_origin(),
        }
    }

    /// Origin prefixed to returned short URLs: the configured public URL,
    /// else the scheme and host the request arrived on.
    pub fn origin(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.public_base_url {
            return base.clone();
        }

        let host = headers
            .get("x-forwarded-host")
            .or_else(|| headers.get(axum::http::header::HOST))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let Some(host) = host else {
            return self.fallback_origin.clone();
        };

        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| matches!(*v, "http" | "https"))
            .unwrap_or("http");

        format!("{}://{}", proto, host)
    }
}

/// Opens the configured link store: the log file at `data_path`, or an
/// in-memory store when none is set.
pub fn open_store(config: &ServerConfig) -> folio_core::Result<Arc<dyn LinkStore>> {
    match &config.data_path {
        Some(path) => {
            info!("Opening link log at {:?}", path);
            Ok(Arc::new(LogStore::open_or_create(path)?))
        }
        None => {
            info!("Using in-memory link store; links are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/shorten", post(handlers::shorten))
        .route("/shorten/:id", get(handlers::redirect))
        .route("/shorten/", get(handlers::missing_id))
        .route("/shorten", get(handlers::missing_id))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn state(config: &ServerConfig) -> AppState {
        AppState::new(Shortener::new(Arc::new(MemoryStore::new())), config)
    }

    #[test]
    fn test_origin_prefers_configured_url() {
        let state = state(&ServerConfig::new().with_public_base_url("https://folio.test/"));
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("other.test"));
        assert_eq!(state.origin(&headers), "https://folio.test");
    }

    #[test]
    fn test_origin_from_request_headers() {
        let state = state(&ServerConfig::new());
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("folio.test:8080"));
        assert_eq!(state.origin(&headers), "http://folio.test:8080");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(state.origin(&headers), "https://folio.test:8080");
    }

    #[test]
    fn test_origin_fallback() {
        let state = state(&ServerConfig::new().with_port(4000));
        assert_eq!(state.origin(&HeaderMap::new()), "http://127.0.0.1:4000");
    }
}
