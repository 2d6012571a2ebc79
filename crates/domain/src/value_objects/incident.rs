//! Incident window value objects
//!
//! An incident window is a recurring per-hour band during which the service
//! is slower (latency incident) or answers with errors (error incident).
//! Membership depends only on the wall-clock minute-of-hour, so the same
//! bands recur every hour for the lifetime of the process.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Minutes in an hour; window arithmetic wraps at this boundary
pub const MINUTES_PER_HOUR: u8 = 60;

/// Trigger minutes are drawn from `0..TRIGGER_MINUTE_SPAN`
pub const TRIGGER_MINUTE_SPAN: u8 = 59;

/// Number of trigger minutes drawn per randomly generated window
pub const TRIGGERS_PER_WINDOW: usize = 2;

/// Shortest randomly drawn incident duration in minutes
pub const MIN_DRAWN_DURATION_MINUTES: u8 = 1;

/// Longest randomly drawn incident duration in minutes
pub const MAX_DRAWN_DURATION_MINUTES: u8 = 10;

/// Which aspect of the service an incident degrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    /// Delays are doubled
    Latency,
    /// Normally successful profiles answer with server errors
    Error,
}

impl IncidentKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of trigger minutes and a duration
///
/// The window is active at minute `m` when `(m - trigger) mod 60` lies in
/// `[0, duration]` for any trigger, so both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentWindow {
    trigger_minutes: Vec<u8>,
    duration_minutes: u8,
}

impl IncidentWindow {
    /// Create a window from explicit trigger minutes and duration
    ///
    /// Trigger minutes must lie in `0..60` and the duration must be shorter
    /// than an hour. Duplicate triggers are collapsed.
    pub fn new(trigger_minutes: Vec<u8>, duration_minutes: u8) -> Result<Self, DomainError> {
        if let Some(bad) = trigger_minutes.iter().find(|m| **m >= MINUTES_PER_HOUR) {
            return Err(DomainError::InvalidIncidentWindow(format!(
                "trigger minute {bad} is outside 0..{MINUTES_PER_HOUR}"
            )));
        }
        if duration_minutes >= MINUTES_PER_HOUR {
            return Err(DomainError::InvalidIncidentWindow(format!(
                "duration of {duration_minutes} minutes must be shorter than an hour"
            )));
        }

        let mut trigger_minutes = trigger_minutes;
        trigger_minutes.sort_unstable();
        trigger_minutes.dedup();

        Ok(Self {
            trigger_minutes,
            duration_minutes,
        })
    }

    /// A window that is never active
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trigger_minutes: Vec::new(),
            duration_minutes: 0,
        }
    }

    #[must_use]
    pub fn trigger_minutes(&self) -> &[u8] {
        &self.trigger_minutes
    }

    #[must_use]
    pub const fn duration_minutes(&self) -> u8 {
        self.duration_minutes
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.trigger_minutes.is_empty()
    }

    /// Whether the window covers the given minute-of-hour
    ///
    /// Minutes at or beyond 60 are reduced modulo the hour.
    #[must_use]
    pub fn is_active_at_minute(&self, minute: u32) -> bool {
        let hour = u32::from(MINUTES_PER_HOUR);
        let minute = minute % hour;
        self.trigger_minutes.iter().any(|&trigger| {
            let offset = (minute + hour - u32::from(trigger)) % hour;
            offset <= u32::from(self.duration_minutes)
        })
    }

    /// Whether the window covers the minute-of-hour of `now`
    #[must_use]
    pub fn is_active_at<T: Timelike>(&self, now: &T) -> bool {
        self.is_active_at_minute(now.minute())
    }
}

impl Default for IncidentWindow {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Display for IncidentWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_disabled() {
            return write!(f, "disabled");
        }
        let triggers: Vec<String> = self
            .trigger_minutes
            .iter()
            .map(|m| format!(":{m:02}"))
            .collect();
        write!(
            f,
            "{} for {}m",
            triggers.join(", "),
            self.duration_minutes
        )
    }
}

/// Activity of both incident windows at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncidentStatus {
    pub latency_active: bool,
    pub error_active: bool,
}

impl IncidentStatus {
    #[must_use]
    pub const fn is_active(&self, kind: IncidentKind) -> bool {
        match kind {
            IncidentKind::Latency => self.latency_active,
            IncidentKind::Error => self.error_active,
        }
    }
}

/// The pair of incident windows fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncidentSchedule {
    pub latency: IncidentWindow,
    pub error: IncidentWindow,
}

impl IncidentSchedule {
    #[must_use]
    pub const fn new(latency: IncidentWindow, error: IncidentWindow) -> Self {
        Self { latency, error }
    }

    /// Schedule with both windows disabled
    #[must_use]
    pub const fn quiet() -> Self {
        Self::new(IncidentWindow::disabled(), IncidentWindow::disabled())
    }

    #[must_use]
    pub fn status_at_minute(&self, minute: u32) -> IncidentStatus {
        IncidentStatus {
            latency_active: self.latency.is_active_at_minute(minute),
            error_active: self.error.is_active_at_minute(minute),
        }
    }

    #[must_use]
    pub fn status_at<T: Timelike>(&self, now: &T) -> IncidentStatus {
        self.status_at_minute(now.minute())
    }
}
