//! HTTP control plane: the concrete `axum` binding the binary wires up
//! around the environment manager and notification pipeline.

pub mod envelope;
mod handlers;
mod routes;

pub use routes::api_routes;

use crate::logging::LogSink;
use crate::manager::EnvironmentManager;
use crate::notify::NotifierRegistry;
use axum::Router;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<EnvironmentManager>,
    pub registry: Arc<NotifierRegistry>,
    pub log: Arc<dyn LogSink>,
}

pub fn create_app(state: AppState) -> Router {
    api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
