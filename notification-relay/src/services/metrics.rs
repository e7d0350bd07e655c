//! Metrics collection for notification-relay.
//!
//! The Prometheus recorder backs both the HTTP middleware counters and the
//! relay counters below.

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), BuildError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    METRICS_HANDLE.set(handle).ok();
    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record the outcome of a downstream delivery attempt.
pub fn record_delivery(provider: &'static str, outcome: &'static str) {
    counter!("relay_deliveries_total", "provider" => provider, "outcome" => outcome).increment(1);
}

/// Record a request turned away before reaching the provider.
pub fn record_rejection(reason: &'static str) {
    counter!("relay_rejections_total", "reason" => reason).increment(1);
}
