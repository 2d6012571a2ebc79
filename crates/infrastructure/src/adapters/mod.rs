//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod system_clock;

pub use system_clock::SystemClock;
