//! Router configuration for the HTTP API.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

/// Create the router with every API route.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/config", get(handlers::ui_config))
        .route("/api/stats", get(handlers::dashboard_stats))
        .route("/api/search", get(handlers::search))
        // Jobs
        .route("/api/jobs", get(handlers::jobs_by_status))
        .route(
            "/api/jobs/:id",
            get(handlers::get_job).delete(handlers::delete_job),
        )
        .route("/api/jobs/pending/:queue", get(handlers::pending_jobs))
        .route(
            "/api/jobs/pending/:queue/paginated",
            get(handlers::pending_page),
        )
        .route("/api/jobs/pending/:queue/count", get(handlers::pending_count))
        // Chains and groups
        .route("/api/chains", get(handlers::list_chains))
        .route("/api/chains/:id", get(handlers::get_chain))
        .route("/api/groups", get(handlers::list_groups))
        .route("/api/groups/:id", get(handlers::get_group))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
