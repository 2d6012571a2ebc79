//! Simulated endpoint handler
//!
//! One handler serves every simulated route; the route table binds each path
//! to its profile. The engine decides delay and outcome, the handler waits
//! on its own task and then writes the matching response.

use application::Evaluation;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{Outcome, Profile};
use infrastructure::telemetry::record_incident_status;

use crate::state::AppState;

/// Body written on every successful simulated response
pub const SUCCESS_BODY: &str = "Hello from example application.";

/// Response header carrying the simulated delay in milliseconds
pub const DELAY_HEADER: &str = "x-synthetic-delay-ms";

/// Evaluate `profile`, wait out the delay and answer with its outcome
pub async fn simulate(State(state): State<AppState>, profile: Profile) -> Response {
    let evaluation = state.simulation.simulate(profile);
    record_incident_status(evaluation.incidents);

    if !evaluation.delay.is_zero() {
        tokio::time::sleep(evaluation.delay).await;
    }

    simulated_response(&evaluation)
}

fn status_for(outcome: Outcome) -> StatusCode {
    StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn simulated_response(evaluation: &Evaluation) -> Response {
    let status = status_for(evaluation.outcome);
    let headers = [(DELAY_HEADER, evaluation.delay_ms().to_string())];

    if evaluation.outcome.is_success() {
        (status, headers, SUCCESS_BODY).into_response()
    } else {
        (status, headers).into_response()
    }
}
