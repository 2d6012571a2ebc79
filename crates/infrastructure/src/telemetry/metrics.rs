//! Prometheus metrics
//!
//! Request counters and latency histograms are recorded through the
//! `metrics` facade and exported by `metrics-exporter-prometheus`. Names and
//! labels match what existing dashboards for this service scrape.

use std::time::Duration;

use domain::{IncidentKind, IncidentStatus};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::TelemetryError;

/// Count of all HTTP requests, labelled by `code` and `method`
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Duration of all HTTP requests, labelled by `code`, `handler` and `method`
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// 1 while an incident window is active, labelled by `kind`
pub const INCIDENT_ACTIVE: &str = "synthetic_incident_active";

/// Classic Prometheus client default buckets
pub const DURATION_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// How often histogram buckets are drained when the recorder is global
pub const DEFAULT_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

fn builder() -> Result<PrometheusBuilder, TelemetryError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            &DURATION_BUCKETS,
        )
        .map_err(|e| TelemetryError::Metrics(e.to_string()))
}

/// Build a recorder without installing it globally
pub fn build_prometheus_recorder() -> Result<PrometheusRecorder, TelemetryError> {
    Ok(builder()?.build_recorder())
}

/// Install the Prometheus recorder as the global `metrics` recorder
///
/// Fails if a global recorder is already installed.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, TelemetryError> {
    let handle = builder()?
        .install_recorder()
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

    describe_metrics();
    info!("Prometheus recorder installed");
    Ok(handle)
}

fn describe_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Count of all HTTP requests");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "Duration of all HTTP requests"
    );
    describe_gauge!(
        INCIDENT_ACTIVE,
        "Whether a simulated incident window is currently active"
    );
}

/// Periodically drain histogram state held by the recorder
pub fn spawn_upkeep(handle: PrometheusHandle, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
            debug!("Metrics upkeep completed");
        }
    })
}

/// Record one finished HTTP request
pub fn record_http_request(handler: &'static str, method: &str, status: u16, elapsed: Duration) {
    let code = status.to_string();
    let method = method.to_lowercase();

    counter!(HTTP_REQUESTS_TOTAL, "code" => code.clone(), "method" => method.clone()).increment(1);
    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "code" => code,
        "handler" => handler,
        "method" => method
    )
    .record(elapsed.as_secs_f64());
}

/// Publish which incident windows are active
pub fn record_incident_status(status: IncidentStatus) {
    for kind in [IncidentKind::Latency, IncidentKind::Error] {
        let value = if status.is_active(kind) { 1.0 } else { 0.0 };
        gauge!(INCIDENT_ACTIVE, "kind" => kind.as_str()).set(value);
    }
}
