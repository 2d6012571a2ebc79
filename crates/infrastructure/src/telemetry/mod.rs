//! Telemetry infrastructure
//!
//! Console logging via `tracing-subscriber` and Prometheus metrics via the
//! `metrics` facade.

mod logging;
pub mod metrics;

pub use logging::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
pub use metrics::{
    build_prometheus_recorder, install_prometheus_recorder, record_http_request,
    record_incident_status, spawn_upkeep,
};
