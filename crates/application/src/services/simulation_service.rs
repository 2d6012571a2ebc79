//! Simulation service - binds the behavior engine to a clock

use std::{fmt, sync::Arc};

use chrono::{DateTime, Timelike, Utc};
use domain::{IncidentKind, IncidentStatus, IncidentWindow, Profile};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    ports::ClockPort,
    services::behavior_engine::{BehaviorEngine, Evaluation},
};

/// One incident window and whether it is active right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowReport {
    pub kind: IncidentKind,
    pub trigger_minutes: Vec<u8>,
    pub duration_minutes: u8,
    pub active: bool,
}

impl WindowReport {
    fn new(kind: IncidentKind, window: &IncidentWindow, active: bool) -> Self {
        Self {
            kind,
            trigger_minutes: window.trigger_minutes().to_vec(),
            duration_minutes: window.duration_minutes(),
            active,
        }
    }
}

/// Snapshot of the incident schedule at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub evaluated_at: DateTime<Utc>,
    pub minute_of_hour: u32,
    pub latency: WindowReport,
    pub error: WindowReport,
    pub acceptable_failure_percent: u8,
}

/// Service answering simulated requests against the current time
pub struct SimulationService {
    engine: Arc<BehaviorEngine>,
    clock: Arc<dyn ClockPort>,
}

impl fmt::Debug for SimulationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl SimulationService {
    pub fn new(engine: Arc<BehaviorEngine>, clock: Arc<dyn ClockPort>) -> Self {
        Self { engine, clock }
    }

    /// Evaluate one request of `profile` at the current time
    #[instrument(skip(self), fields(profile = %profile))]
    pub fn simulate(&self, profile: Profile) -> Evaluation {
        let now = self.clock.now();
        let evaluation = self.engine.evaluate(profile, &now);

        debug!(
            delay_ms = evaluation.delay_ms(),
            outcome = %evaluation.outcome,
            latency_incident = evaluation.incidents.latency_active,
            error_incident = evaluation.incidents.error_active,
            "Request evaluated"
        );

        evaluation
    }

    /// Which incident windows are active at the current time
    pub fn incident_status(&self) -> IncidentStatus {
        self.engine.schedule().status_at(&self.clock.now())
    }

    /// Describe both incident windows and their state at the current time
    pub fn incident_report(&self) -> IncidentReport {
        let now = self.clock.now();
        let schedule = self.engine.schedule();
        let status = schedule.status_at(&now);

        IncidentReport {
            evaluated_at: now,
            minute_of_hour: now.minute(),
            latency: WindowReport::new(
                IncidentKind::Latency,
                &schedule.latency,
                status.latency_active,
            ),
            error: WindowReport::new(IncidentKind::Error, &schedule.error, status.error_active),
            acceptable_failure_percent: self.engine.acceptable_failure_percent(),
        }
    }
}
