//! Consistent response envelope for the control-plane API.
//!
//! Every response is wrapped in either [`ApiResponse`] (success) or
//! [`ApiErrorResponse`] (error), and `CoreError` maps onto one HTTP status
//! per variant via `From<CoreError> for ApiErrorResponse`.

use crate::errors::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::default(),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }

    pub fn created(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::default(),
        };
        (StatusCode::CREATED, axum::Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &str, msg: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorDetail {
                code: code.to_string(),
                message: msg.into(),
            },
            meta: ResponseMeta::default(),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, axum::Json(self)).into_response()
    }
}

/// Maps each `CoreError` variant onto the HTTP status a control-plane client
/// would expect: missing resources are 404s, conflicts and already-exists
/// are 409s, everything else the caller could have avoided is a 400.
impl From<CoreError> for ApiErrorResponse {
    fn from(e: CoreError) -> Self {
        match &e {
            CoreError::NotFound(_) => Self::build(StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
            CoreError::AlreadyExists(_) => {
                Self::build(StatusCode::CONFLICT, "ALREADY_EXISTS", e.to_string())
            }
            CoreError::Conflict(_) => Self::build(StatusCode::CONFLICT, "CONFLICT", e.to_string()),
            CoreError::InvalidArgument(_)
            | CoreError::ValidationError(_)
            | CoreError::UnknownSpecies(_)
            | CoreError::DuplicateId(_) => {
                Self::build(StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string())
            }
            CoreError::Mismatch { .. } | CoreError::Io(_) | CoreError::Transient(_) => {
                Self::build(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", e.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ok_response_shape() {
        let resp = ApiResponse::ok(serde_json::json!({"hello": "world"}));
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn not_found_core_error_maps_to_404() {
        let resp: ApiErrorResponse = CoreError::not_found("environment e1").into();
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.error.code, "NOT_FOUND");
    }

    #[test]
    fn already_exists_maps_to_409() {
        let resp: ApiErrorResponse = CoreError::AlreadyExists("e1".into()).into();
        assert_eq!(resp.status, StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_species_maps_to_400() {
        let resp: ApiErrorResponse = CoreError::UnknownSpecies("X".into()).into();
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    }
}
