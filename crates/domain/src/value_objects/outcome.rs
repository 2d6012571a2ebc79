//! Simulated outcome value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated result category for a request
///
/// Outcomes are the product of the behavior engine, not failures of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    ServerError,
    NotFound,
}

impl Outcome {
    /// HTTP status code that represents this outcome
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Success => 200,
            Self::ServerError => 500,
            Self::NotFound => 404,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ServerError => write!(f, "server_error"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}
