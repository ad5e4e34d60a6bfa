//! Control-plane route handlers: one function per route, each a thin
//! adapter between Axum extractors and the `EnvironmentManager` /
//! `NotifierRegistry` / `NotificationPipeline` underneath.

use super::envelope::{ApiResponse, ApiResult};
use crate::errors::CoreError;
use crate::model::{InsertMoleculeRequest, Molecule, SchemaConfig};
use crate::notifiers::{WebSocketNotifier, WebhookNotifier};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::AppState;

pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

pub async fn list_environments(State(state): State<AppState>) -> Response {
    ApiResponse::ok(state.manager.list())
}

/// `POST /env/{id}/schema` installs a schema for `id`, creating the
/// environment if it doesn't exist yet and hot-swapping the schema of an
/// already-running one otherwise.
pub async fn upsert_schema(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
    Json(config): Json<SchemaConfig>,
) -> ApiResult<Response> {
    match state.manager.create(environment_id.clone(), config.clone()) {
        Ok(_) => Ok(ApiResponse::created(serde_json::json!({"environment_id": environment_id}))),
        Err(CoreError::AlreadyExists(_)) => {
            state.manager.update_schema(&environment_id, config).await?;
            Ok(ApiResponse::ok(serde_json::json!({"environment_id": environment_id})))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_environment(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
) -> ApiResult<Response> {
    state.manager.delete(&environment_id).await?;
    Ok(ApiResponse::ok(serde_json::json!({"deleted": environment_id})))
}

pub async fn insert_molecule(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
    Json(req): Json<InsertMoleculeRequest>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    let molecule = Molecule {
        id: String::new(),
        species: req.species,
        payload: req.payload,
        energy: req.energy.unwrap_or(1.0),
        stability: req.stability.unwrap_or(1.0),
        tags: req.tags,
        created_at: 0,
        last_touched_at: 0,
    };
    let inserted = env.insert_molecule(molecule).await?;
    Ok(ApiResponse::created(inserted))
}

pub async fn list_molecules(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    Ok(ApiResponse::ok(env.molecules().await))
}

pub async fn run_tick(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    env.tick().await;
    Ok(ApiResponse::ok(serde_json::json!({"tick": env.current_tick().await})))
}

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    1000
}

pub async fn start_environment(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
    Query(query): Query<StartQuery>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    env.start(Duration::from_millis(query.interval_ms.max(1))).await;
    Ok(ApiResponse::ok(serde_json::json!({"running": true})))
}

pub async fn stop_environment(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    env.stop().await;
    Ok(ApiResponse::ok(serde_json::json!({"running": env.is_running()})))
}

pub async fn save_snapshot(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    let path = env.save_snapshot_now().await?;
    Ok(ApiResponse::ok(serde_json::json!({
        "status": "ok",
        "path": path.map(|p| p.display().to_string()),
    })))
}

/// Read-only view of the current state shaped as a `Snapshot`, built purely
/// from in-memory state rather than what's last been flushed to disk.
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
) -> ApiResult<Response> {
    let env = state.manager.get(&environment_id)?;
    Ok(ApiResponse::ok(env.to_snapshot().await))
}

pub async fn list_notifiers(State(state): State<AppState>) -> Response {
    let notifiers: Vec<_> = state
        .registry
        .list()
        .into_iter()
        .map(|(id, kind)| serde_json::json!({"id": id, "kind": kind}))
        .collect();
    ApiResponse::ok(notifiers)
}

#[derive(Debug, Deserialize)]
pub struct RegisterNotifierRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub notifier_type: String,
    pub config: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WebhookConfig {
    url: String,
    #[serde(default)]
    headers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct WebSocketConfig {
    url: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterNotifierResponse {
    pub id: String,
}

/// Registers a concrete notifier transport. `type` selects which built-in
/// `Notifier` implementation backs `config` — `webhook` takes `{url,
/// headers}`, `websocket` takes `{url}`.
pub async fn register_notifier(
    State(state): State<AppState>,
    Json(req): Json<RegisterNotifierRequest>,
) -> ApiResult<Response> {
    let notifier: Arc<dyn crate::notifiers::Notifier> = match req.notifier_type.as_str() {
        "webhook" => {
            let config: WebhookConfig = serde_json::from_value(req.config)
                .map_err(|e| CoreError::invalid_argument(format!("invalid webhook config: {e}")))?;
            Arc::new(WebhookNotifier::with_headers(
                req.id.clone(),
                config.url,
                config.headers.into_iter().collect(),
            ))
        }
        "websocket" => {
            let config: WebSocketConfig = serde_json::from_value(req.config)
                .map_err(|e| CoreError::invalid_argument(format!("invalid websocket config: {e}")))?;
            Arc::new(WebSocketNotifier::new(req.id.clone(), config.url))
        }
        other => {
            return Err(CoreError::invalid_argument(format!("unknown notifier type: {other}")).into())
        }
    };
    state.registry.register_notifier(notifier)?;
    Ok(ApiResponse::created(RegisterNotifierResponse { id: req.id }))
}

pub async fn unregister_notifier(
    State(state): State<AppState>,
    Path(notifier_id): Path<String>,
) -> ApiResult<Response> {
    state.registry.unregister(&notifier_id).await?;
    Ok(ApiResponse::ok(serde_json::json!({"deleted": notifier_id})))
}
