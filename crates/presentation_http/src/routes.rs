//! Route definitions

use axum::{Router, extract::State, routing::get};
use domain::Profile;

use crate::{
    handlers,
    middleware::{HttpMetricsLayer, RequestIdLayer},
    state::AppState,
};

/// Simulated routes and the profile each one serves
pub const SIMULATED_ROUTES: [(&str, Profile); 7] = [
    ("/good", Profile::Good),
    ("/ok", Profile::Ok),
    ("/veryslow", Profile::VerySlow),
    ("/acceptable", Profile::Acceptable),
    ("/err", Profile::Err),
    ("/bad", Profile::Bad),
    ("/notfound", Profile::NotFound),
];

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Operational endpoints, not instrumented
        .route("/health", get(handlers::health::health_check))
        .route("/incidents", get(handlers::incidents::incidents))
        .route("/metrics", get(handlers::metrics::prometheus_metrics));

    for (path, profile) in SIMULATED_ROUTES {
        router = router.route(
            path,
            get(move |state: State<AppState>| handlers::simulate::simulate(state, profile))
                .layer(HttpMetricsLayer::new(profile.handler_label())),
        );
    }

    router
        .fallback(handlers::route_not_found)
        .layer(RequestIdLayer::new())
        .with_state(state)
}
