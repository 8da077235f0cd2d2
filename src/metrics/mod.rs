// Metrics module for Prometheus observability

mod registry;

pub use registry::{
    gather_metrics, CACHE_ENTRIES, CACHE_OPERATIONS, GATE_REJECTIONS, PROVIDER_CALLS,
    PROVIDER_DURATION, QUOTA_USED, REQUESTS_TOTAL, REQUEST_DURATION,
};

/// Helper to record request metrics
pub fn record_request(endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record provider call metrics (status 0 = transport failure)
pub fn record_provider_call(model: &str, status_code: u16, duration_secs: f64) {
    PROVIDER_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    PROVIDER_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helpers to record response-cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_insert() {
    CACHE_OPERATIONS.with_label_values(&["insert"]).inc();
}

pub fn record_cache_eviction() {
    CACHE_OPERATIONS.with_label_values(&["eviction"]).inc();
}

pub fn update_cache_entries(count: usize) {
    CACHE_ENTRIES.with_label_values(&["active"]).set(count as f64);
}

/// Helper to record gate rejections by reason
pub fn record_rejection(reason: &str) {
    GATE_REJECTIONS.with_label_values(&[reason]).inc();
}

pub fn update_quota_used(count: u32) {
    QUOTA_USED.with_label_values(&["today"]).set(count as f64);
}
