//! Application services - Use case implementations

mod behavior_engine;
mod simulation_service;

pub use behavior_engine::{
    BehaviorEngine, DEFAULT_ACCEPTABLE_FAILURE_PERCENT, EngineSettings, Evaluation, IncidentPlan,
    draw_incident_window,
};
pub use simulation_service::{IncidentReport, SimulationService, WindowReport};
