//! Prometheus metrics.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return the render handle.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Record one routing decision by kind ("agent", "none", "unavailable",
/// "skipped").
pub fn record_routing_decision(kind: &'static str) {
    metrics::counter!("insight_routing_decisions_total", "decision" => kind).increment(1);
}

/// Record one agent dispatch with its wall-clock latency.
pub fn record_dispatch(agent: &str, latency_secs: f64) {
    metrics::counter!("insight_dispatches_total", "agent" => agent.to_string()).increment(1);
    metrics::histogram!("insight_dispatch_seconds", "agent" => agent.to_string())
        .record(latency_secs);
}

/// Record the listener count after a broadcast.
pub fn record_listeners(count: usize) {
    metrics::gauge!("insight_listeners").set(count as f64);
}

/// Handle without installing the global recorder (tests build many states).
#[cfg(test)]
pub(crate) fn test_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
