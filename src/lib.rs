pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
pub mod seed;
pub mod service;
pub mod session;
pub mod state;
pub mod utils;

use axum::middleware;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router: routes, session middleware, request
/// tracing.
pub fn build_router(state: AppState) -> axum::Router {
    routes::routes()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::attach_session,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
