//! # Traffic Server
//!
//! HTTP API serving traffic flow predictions alongside the historical
//! observations they can be compared with.
//!
//! All state is loaded once at startup and shared read-only between
//! requests; see [`state::AppState`].

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};
pub use state::{AppState, SharedState};

/// Build the router with every endpoint mounted
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/favicon.ico", get(routes::favicon))
        .route("/predict", post(routes::predict))
        .route("/api/traffic", get(routes::traffic))
        .route("/api/cities", get(routes::cities))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
