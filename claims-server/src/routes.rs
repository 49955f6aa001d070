use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{health, query, sessions, variants},
    server::ClaimsServer,
};

/// Create health check routes
pub fn health_routes() -> Router<ClaimsServer> {
    Router::new().route("/health", get(health::health_check))
}

/// Create generator preset routes
pub fn variant_routes() -> Router<ClaimsServer> {
    Router::new().route("/variants", get(variants::list_variants))
}

/// Create session lifecycle and dataset routes
pub fn session_routes() -> Router<ClaimsServer> {
    Router::new()
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/upload", post(sessions::upload_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/:id/filter", post(query::filter_session))
        .route("/sessions/:id/query", post(query::query_session))
        .route("/sessions/:id/export", get(query::export_session))
        .route("/sessions/:id/dimensions/:kind", get(query::export_dimension))
}

/// Create all application routes
pub fn create_routes() -> Router<ClaimsServer> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", Router::new().merge(variant_routes()).merge(session_routes()))
}
