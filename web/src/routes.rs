//! Router configuration for the booking server.

use crate::handlers::{auth, availability, health, quotes};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/verify", post(auth::verify))
        .route("/availability", get(availability::list_availability))
        .route("/properties/:id", get(availability::get_property))
        .route("/quotes", post(quotes::create_quote))
        .route("/quotes/:token/commit", post(quotes::commit_quote));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
