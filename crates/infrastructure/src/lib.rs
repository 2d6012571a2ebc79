//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and wires the ambient
//! concerns: configuration loading, logging and Prometheus metrics.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, IncidentConfig, ServerConfig, SimulationConfig};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
