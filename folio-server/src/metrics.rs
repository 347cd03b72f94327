/// Prometheus metrics for the Folio short-link server
///
/// Metrics register with the default registry on first use and are exposed
/// at the /metrics endpoint in Prometheus text format.

use lazy_static::lazy_static;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter,
    register_int_counter_vec, Encoder, HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use std::time::Instant;

lazy_static! {
    /// Total number of HTTP requests by endpoint and status code
    ///
    /// Labels:
    /// - endpoint: shorten, redirect
    /// - status: numeric HTTP status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        opts!(
            "folio_http_requests_total",
            "Total number of HTTP requests"
        ),
        &["endpoint", "status"]
    )
    .unwrap();

    /// HTTP request duration in seconds
    ///
    /// Buckets: 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0 seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        histogram_opts!(
            "folio_http_request_duration_seconds",
            "HTTP request duration in seconds",
            vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
        ),
        &["endpoint"]
    )
    .unwrap();

    /// Total number of short links created
    pub static ref LINKS_CREATED_TOTAL: IntCounter = register_int_counter!(
        opts!(
            "folio_links_created_total",
            "Total number of short links created"
        )
    )
    .unwrap();

    /// Redirect lookups by outcome
    ///
    /// Labels:
    /// - outcome: found, not_found, missing_id, error
    pub static ref REDIRECTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        opts!(
            "folio_redirects_total",
            "Total number of short link lookups by outcome"
        ),
        &["outcome"]
    )
    .unwrap();

    /// Shorten requests rejected by the rate limiter
    pub static ref RATE_LIMITED_REQUESTS: IntCounter = register_int_counter!(
        opts!(
            "folio_rate_limited_requests_total",
            "Total number of rate-limited requests"
        )
    )
    .unwrap();
}

/// Force registration so every series shows up on the first scrape
pub fn register_metrics() {
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&LINKS_CREATED_TOTAL);
    lazy_static::initialize(&REDIRECTS_TOTAL);
    lazy_static::initialize(&RATE_LIMITED_REQUESTS);
}

/// Encode metrics in Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Records count and latency for one request
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn start(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    pub fn finish(self, status: u16) {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&[self.endpoint, &status.to_string()])
            .inc();
        HTTP_REQUEST_DURATION_SECONDS
            .with_label_values(&[self.endpoint])
            .observe(self.start.elapsed().as_secs_f64());
    }
}
