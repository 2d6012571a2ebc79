//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod clock_port;

pub use clock_port::ClockPort;
#[cfg(test)]
pub use clock_port::MockClockPort;
