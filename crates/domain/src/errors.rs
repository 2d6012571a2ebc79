//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Profile name outside the enumerated set
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// Incident window parameters out of range
    #[error("Invalid incident window: {0}")]
    InvalidIncidentWindow(String),
}
