//! Application state shared across handlers

use std::{sync::Arc, time::Instant};

use application::SimulationService;
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Behavior engine bound to the wall clock
    pub simulation: Arc<SimulationService>,
    /// Handle to the Prometheus recorder for rendering `/metrics`
    pub metrics: PrometheusHandle,
    /// When the server started, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(simulation: Arc<SimulationService>, metrics: PrometheusHandle) -> Self {
        Self {
            simulation,
            metrics,
            started_at: Instant::now(),
        }
    }
}
