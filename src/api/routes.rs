//! Route configuration.

use crate::api::{handlers, portfolio, security};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Search
        .route("/api", get(handlers::search_securities))
        // Portfolios
        .route(
            "/portfolio",
            get(portfolio::list_portfolios).post(portfolio::create_portfolio),
        )
        .route(
            "/portfolio/{link}",
            get(portfolio::get_portfolio)
                .put(portfolio::update_portfolio)
                .delete(portfolio::delete_portfolio),
        )
        // Securities
        .route(
            "/security",
            get(security::list_securities)
                .post(security::create_security)
                .put(security::update_security),
        )
        .route(
            "/security/{link}",
            get(security::get_securities).delete(security::delete_security),
        )
        .with_state(state)
}
