//! Synthetic service HTTP presentation layer
//!
//! Serves the simulated routes, the Prometheus scrape endpoint and a few
//! operational views.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{HttpMetricsLayer, RequestIdLayer};
pub use routes::{SIMULATED_ROUTES, create_router};
pub use state::AppState;
