//! Prometheus scrape endpoint

use axum::{extract::State, http::header, response::IntoResponse};
use infrastructure::telemetry::record_incident_status;

use crate::state::AppState;

/// Content type of the Prometheus text exposition format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every recorded metric in Prometheus text format
///
/// The incident gauge is refreshed first so that it tracks the clock even
/// when no simulated request has arrived since a window opened or closed.
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    record_incident_status(state.simulation.incident_status());

    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use application::{
        BehaviorEngine, EngineSettings, IncidentPlan, SimulationService, ports::ClockPort,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use domain::IncidentWindow;

    use super::*;

    struct FixedClock(DateTime<Utc>);

    impl ClockPort for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[tokio::test]
    async fn scrape_reports_incident_opened_without_requests() {
        let recorder = infrastructure::telemetry::build_prometheus_recorder().unwrap();
        let engine = BehaviorEngine::new(EngineSettings {
            seed: Some(11),
            latency_incident: IncidentPlan::Disabled,
            error_incident: IncidentPlan::Fixed(IncidentWindow::new(vec![15], 4).unwrap()),
            ..Default::default()
        })
        .unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 8, 17, 0).unwrap());
        let simulation = SimulationService::new(Arc::new(engine), Arc::new(clock));
        let state = AppState::new(Arc::new(simulation), recorder.handle());

        let guard = metrics::set_default_local_recorder(&recorder);
        let response = prometheus_metrics(State(state)).await.into_response();
        drop(guard);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("synthetic_incident_active{kind=\"error\"} 1"));
        assert!(text.contains("synthetic_incident_active{kind=\"latency\"} 0"));
    }
}
