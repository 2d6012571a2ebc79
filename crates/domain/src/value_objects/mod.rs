//! Value Objects - Immutable, identity-less domain primitives

mod incident;
mod outcome;
mod profile;

pub use incident::{
    IncidentKind, IncidentSchedule, IncidentStatus, IncidentWindow, MAX_DRAWN_DURATION_MINUTES,
    MIN_DRAWN_DURATION_MINUTES, MINUTES_PER_HOUR, TRIGGER_MINUTE_SPAN, TRIGGERS_PER_WINDOW,
};
pub use outcome::Outcome;
pub use profile::{OutcomePolicy, Profile, ProfileSpec};
