//! Prometheus metrics for the validation pipeline.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Validations by outcome and the stage that decided it.
pub static VALIDATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "samlvalidate_validations_total",
            "Total ticket validations",
        ),
        &["outcome", "stage"], // outcome: "success" | "failure"
    )
    .unwrap()
});

/// Attribute resolver errors recovered as an empty attribute set.
pub static ATTRIBUTE_RESOLUTION_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "samlvalidate_attribute_resolution_failures_total",
        "Attribute resolution failures (validation continued)",
    )
    .unwrap()
});

/// Usage tracking errors ignored by the pipeline.
pub static TRACKING_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "samlvalidate_tracking_failures_total",
        "Usage tracking failures (validation continued)",
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(VALIDATIONS_TOTAL.clone()),
        Box::new(ATTRIBUTE_RESOLUTION_FAILURES.clone()),
        Box::new(TRACKING_FAILURES.clone()),
    ]
}
