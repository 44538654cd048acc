//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::rate_limit;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let mut api_routes = Router::new()
        // Health and reference data
        .route("/health", get(handlers::health_check))
        .route("/permissions/check", get(handlers::check_permission))
        .route("/permissions/:role", get(handlers::role_permissions))
        .route("/intake/questions", get(handlers::list_questions))
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/projects/:id/intake",
            get(handlers::get_intake).post(handlers::submit_intake),
        )
        // Risk exceptions
        .route(
            "/projects/:id/exceptions",
            get(handlers::list_exceptions).post(handlers::request_exception),
        )
        .route("/exceptions/expirations", get(handlers::exception_expirations))
        .route("/exceptions/:id/approve", post(handlers::approve_exception))
        .route("/exceptions/:id/deny", post(handlers::deny_exception))
        // RACI
        .route(
            "/projects/:id/raci",
            get(handlers::get_raci).put(handlers::put_raci),
        )
        // Gate reviews
        .route(
            "/projects/:id/gates",
            get(handlers::list_gate_reviews).post(handlers::open_gate_review),
        )
        .route("/gates/:id/decision", post(handlers::decide_gate_review))
        // Calculators
        .route("/roi", post(handlers::calculate_roi))
        .route("/vendors/score", post(handlers::score_vendor));

    if state.config.rate_limit.enabled {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));
    }

    // Build router with middleware
    let router = Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http());

    let router = if state.config.server.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
