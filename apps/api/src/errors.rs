use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::models::resume::ValidationError;
use crate::notify::{Action, Phase};
use crate::session::SessionError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Validation(e) => e.into(),
            SessionError::Store(e) => e.into(),
        }
    }
}

fn store_response(e: &StoreError) -> (StatusCode, &'static str, String) {
    match e {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
        StoreError::DuplicateId { .. } => (StatusCode::CONFLICT, "CONFLICT", e.to_string()),
        StoreError::KindMismatch { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
        }
        StoreError::Io(_) | StoreError::Serialize(_) => {
            tracing::error!("Storage error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "A storage error occurred".to_string(),
            )
        }
    }
}

fn export_response(e: &ExportError) -> (StatusCode, &'static str, String) {
    let generic = Action::Export.notification(Phase::Failed).description.to_string();
    match e {
        ExportError::MissingName => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
        ExportError::Busy => (StatusCode::CONFLICT, "EXPORT_BUSY", e.to_string()),
        ExportError::MissingSurface | ExportError::Rasterize(_) => {
            tracing::error!("Export rejected: {e}");
            (StatusCode::UNPROCESSABLE_ENTITY, "EXPORT_FAILED", generic)
        }
        ExportError::Encode(_) | ExportError::Io(_) | ExportError::InvalidScale(_) => {
            tracing::error!("Export error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED", generic)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Store(e) => store_response(e),
            AppError::Export(e) => export_response(e),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
