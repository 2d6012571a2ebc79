//! HTTP middleware components
//!
//! Request correlation and per-route request metrics.

pub mod http_metrics;
pub mod request_id;

pub use http_metrics::{HttpMetricsLayer, HttpMetricsService};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdService};
