//! Domain layer for the synthetic service
//!
//! Contains the behavior profiles, simulated outcomes and incident windows.
//! This layer has no I/O and defines the ubiquitous language.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
