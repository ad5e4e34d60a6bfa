//! Route table for the control-plane API.

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers;
use super::AppState;

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/envs", get(handlers::list_environments))
        .route("/env/:id/schema", post(handlers::upsert_schema))
        .route("/env/:id", delete(handlers::delete_environment))
        .route("/env/:id/molecule", post(handlers::insert_molecule))
        .route("/env/:id/molecules", get(handlers::list_molecules))
        .route("/env/:id/tick", post(handlers::run_tick))
        .route("/env/:id/start", post(handlers::start_environment))
        .route("/env/:id/stop", post(handlers::stop_environment))
        .route("/env/:id/snapshot", post(handlers::save_snapshot))
        .route("/env/:id/snapshot", get(handlers::get_snapshot))
        .route("/notifiers", get(handlers::list_notifiers))
        .route("/notifiers", post(handlers::register_notifier))
        .route("/notifiers/:id", delete(handlers::unregister_notifier))
        .with_state(state)
}
