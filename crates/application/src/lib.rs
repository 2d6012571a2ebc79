//! Application layer - Use cases and orchestration
//!
//! Hosts the behavior engine that turns a profile and the current time into
//! a delay and a simulated outcome, plus the ports it depends on.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
