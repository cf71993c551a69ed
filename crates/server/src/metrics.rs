//! Prometheus metrics for observability.
//!
//! HTTP request metrics live here; validation pipeline metrics come from
//! `samlvalidate_core::metrics` and are registered into the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "samlvalidate_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("samlvalidate_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "samlvalidate_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let http: Vec<Box<dyn Collector>> = vec![
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
    ];

    // Core metrics (validation outcomes, recovered failures)
    let core = samlvalidate_core::metrics::all_metrics();

    for metric in http.into_iter().chain(core) {
        if let Err(e) = registry.register(metric) {
            tracing::warn!(error = %e, "failed to register metric");
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Normalize a path for metric labels.
///
/// Only routed paths keep their own label; everything else collapses into
/// `other` so probes for arbitrary URLs cannot grow the label set.
pub fn normalize_path(path: &str) -> &'static str {
    match path {
        "/samlValidate" => "/samlValidate",
        "/health" => "/health",
        "/metrics" => "/metrics",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_known_routes() {
        assert_eq!(normalize_path("/samlValidate"), "/samlValidate");
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn test_normalize_path_unknown_routes() {
        assert_eq!(normalize_path("/samlValidate/ST-1-abc"), "other");
        assert_eq!(normalize_path("/"), "other");
        assert_eq!(normalize_path("/SAMLVALIDATE"), "other");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access metrics to ensure they're initialized
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics().unwrap();
        assert!(output.contains("samlvalidate_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        // Prometheus only outputs vectors that have at least one child
        samlvalidate_core::metrics::VALIDATIONS_TOTAL
            .with_label_values(&["failure", "ticket"])
            .inc();
        HTTP_REQUEST_DURATION
            .with_label_values(&["POST", "/samlValidate", "200"])
            .observe(0.01);

        let output = encode_metrics().unwrap();

        assert!(output.contains("samlvalidate_http_request_duration_seconds"));
        assert!(output.contains("samlvalidate_http_requests_in_flight"));
        assert!(output.contains("samlvalidate_validations_total"));
        assert!(output.contains("samlvalidate_attribute_resolution_failures_total"));
        assert!(output.contains("samlvalidate_tracking_failures_total"));
    }
}
