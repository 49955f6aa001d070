//! Claims Server - HTTP API over the synthetic claims engine
//!
//! Each client works in a server-held session: one generated or uploaded
//! dataset kept in memory until it is deleted. Filters, queries and exports
//! always run against the session's unfiltered source table.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::*;
pub use server::ClaimsServer;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: ClaimsServer) -> Router {
    let upload_limit = server.settings.server.max_upload_bytes;
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(DefaultBodyLimit::max(upload_limit))
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
