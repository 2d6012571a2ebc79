//! Incident schedule view
//!
//! Exposes the incident windows drawn at startup so that dashboards and
//! alert rules can be lined up against the injected degradation.

use application::IncidentReport;
use axum::{Json, extract::State};

use crate::state::AppState;

/// Current incident schedule and activity
pub async fn incidents(State(state): State<AppState>) -> Json<IncidentReport> {
    Json(state.simulation.incident_report())
}
