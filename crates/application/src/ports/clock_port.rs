//! Clock port
//!
//! Supplies the wall-clock instant consulted for incident windows.

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

/// Port for reading the current time
#[cfg_attr(test, automock)]
pub trait ClockPort: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}
