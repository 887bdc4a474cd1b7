//! StoryLines: local HTTP API.
//!
//! The desktop shell's webview talks to this server. All state lives in one
//! in-memory library guarded by an async mutex and saved after every change.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full application router.
pub fn app(state: state::AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the webview origin once the
    // desktop shell pins one.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/books", routes::books_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
