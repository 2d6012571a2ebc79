//! Behavior profile value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// How a profile decides its outcome once the delay has been paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomePolicy {
    /// Succeeds unless the error incident window is active
    SuccessUnlessErrorIncident,
    /// Fails with its own always-on stochastic rate
    StochasticFailure,
    /// Always answers with a server error
    AlwaysServerError,
    /// Always answers not found, without any delay
    AlwaysNotFound,
}

/// Delay range and outcome policy for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Lower bound of the delay draw (inclusive)
    pub min_delay_ms: u64,
    /// Upper bound of the delay draw (inclusive)
    pub max_delay_ms: u64,
    /// Outcome policy
    pub policy: OutcomePolicy,
}

/// Named request-handling behavior template
///
/// Each profile maps to a fixed delay range and outcome policy:
///
/// | Profile      | Delay (ms)  | Outcome                                |
/// |--------------|-------------|----------------------------------------|
/// | `good`       | 100..=500   | success, error-incident sensitive      |
/// | `ok`         | 500..=800   | success, error-incident sensitive      |
/// | `veryslow`   | 800..=2000  | success, error-incident sensitive      |
/// | `acceptable` | 200..=1000  | stochastic failure                     |
/// | `err`        | 200..=400   | always server error                    |
/// | `bad`        | 500..=2000  | always server error                    |
/// | `notfound`   | none        | always not found                       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Fast and successful
    Good,
    /// Small delay, successful
    Ok,
    /// Significant delay, successful
    VerySlow,
    /// Reasonable delay, occasionally fails
    Acceptable,
    /// Small delay, always fails
    Err,
    /// Significant delay, always fails
    Bad,
    /// No delay, always not found
    NotFound,
}

impl Profile {
    /// Every profile, in route registration order
    pub const ALL: [Self; 7] = [
        Self::Good,
        Self::Ok,
        Self::VerySlow,
        Self::Acceptable,
        Self::Err,
        Self::Bad,
        Self::NotFound,
    ];

    /// Identifier used in routes and configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Ok => "ok",
            Self::VerySlow => "veryslow",
            Self::Acceptable => "acceptable",
            Self::Err => "err",
            Self::Bad => "bad",
            Self::NotFound => "notfound",
        }
    }

    /// Label reported as the `handler` dimension of request metrics
    ///
    /// Dashboards built against the existing exporter expect `not-found`
    /// rather than the route name for the not-found profile.
    #[must_use]
    pub const fn handler_label(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            other => other.as_str(),
        }
    }

    /// Delay range and outcome policy for this profile
    #[must_use]
    pub const fn spec(&self) -> ProfileSpec {
        let (min_delay_ms, max_delay_ms, policy) = match self {
            Self::Good => (100, 500, OutcomePolicy::SuccessUnlessErrorIncident),
            Self::Ok => (500, 800, OutcomePolicy::SuccessUnlessErrorIncident),
            Self::VerySlow => (800, 2000, OutcomePolicy::SuccessUnlessErrorIncident),
            Self::Acceptable => (200, 1000, OutcomePolicy::StochasticFailure),
            Self::Err => (200, 400, OutcomePolicy::AlwaysServerError),
            Self::Bad => (500, 2000, OutcomePolicy::AlwaysServerError),
            Self::NotFound => (0, 0, OutcomePolicy::AlwaysNotFound),
        };
        ProfileSpec {
            min_delay_ms,
            max_delay_ms,
            policy,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownProfile(s.to_string()))
    }
}
