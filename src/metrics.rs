/// Metrics and telemetry for Chirpy
///
/// Prometheus-compatible metrics, owned by a single `Metrics` value that is
/// injected into the router instead of living in process globals:
/// - Static file server hits (shown on the admin page, reset by admin reset)
/// - HTTP request counts and latencies
use crate::error::{ChirpError, ChirpResult};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::{sync::Arc, time::Instant};

/// Process metrics registry
pub struct Metrics {
    registry: Registry,
    file_server_hits: IntCounter,
    http_requests: IntCounterVec,
    http_request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> ChirpResult<Self> {
        let registry = Registry::new_custom(Some("chirpy".to_string()), None)
            .map_err(metrics_error)?;

        let file_server_hits = IntCounter::new(
            "fileserver_hits_total",
            "Requests served by the static file server since the last reset",
        )
        .map_err(metrics_error)?;

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status"],
        )
        .map_err(metrics_error)?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latencies in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method"],
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(file_server_hits.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(http_requests.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(http_request_duration.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            registry,
            file_server_hits,
            http_requests,
            http_request_duration,
        })
    }

    pub fn record_file_server_hit(&self) {
        self.file_server_hits.inc();
    }

    pub fn file_server_hits(&self) -> u64 {
        self.file_server_hits.get()
    }

    pub fn reset_file_server_hits(&self) {
        self.file_server_hits.reset();
    }

    /// Record a completed HTTP request
    pub fn record_http_request(&self, method: &str, status: u16, duration: f64) {
        self.http_requests
            .with_label_values(&[method, &status.to_string()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method])
            .observe(duration);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> ChirpResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;

        String::from_utf8(buffer)
            .map_err(|e| ChirpError::Internal(format!("Metrics output is not UTF-8: {}", e)))
    }
}

fn metrics_error(err: prometheus::Error) -> ChirpError {
    ChirpError::Internal(format!("Metrics error: {}", err))
}

/// Count every request that reaches the static file server
pub async fn track_file_server_hits(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    metrics.record_file_server_hit();
    next.run(request).await
}

/// Record method, status and latency of every request
pub async fn record_requests(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    metrics.record_http_request(
        &method,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
