use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cv::CvError;
use crate::encryption::CryptoError;
use crate::harvester::HarvestError;
use crate::store::StoreError;
use crate::students::StudentError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream rate limited: {0}")]
    UpstreamRateLimited(String),

    #[error("Integrity error: {0}")]
    Integrity(#[from] CryptoError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CvError> for AppError {
    fn from(err: CvError) -> Self {
        match err {
            CvError::NotUtf8 => AppError::Validation(err.to_string()),
            CvError::Pdf(_) => AppError::UnprocessableEntity(err.to_string()),
        }
    }
}

impl From<HarvestError> for AppError {
    fn from(err: HarvestError) -> Self {
        match err {
            HarvestError::UpstreamUnavailable { .. } => AppError::UpstreamUnavailable(err.to_string()),
            HarvestError::RateLimited { .. } => AppError::UpstreamRateLimited(err.to_string()),
            HarvestError::Validation(msg) => AppError::UnprocessableEntity(msg),
            HarvestError::Crypto(e) => AppError::Integrity(e),
            HarvestError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<StudentError> for AppError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::MissingEmail => AppError::Validation(err.to_string()),
            StudentError::Crypto(e) => AppError::Integrity(e),
            StudentError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("invalid multipart body: {}", err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::UpstreamUnavailable(msg) => {
                tracing::warn!("Upstream unavailable: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE", msg.clone())
            }
            AppError::UpstreamRateLimited(msg) => {
                tracing::warn!("Upstream rate limited: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_RATE_LIMITED",
                    msg.clone(),
                )
            }
            AppError::Integrity(e) => {
                tracing::error!("Integrity error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTEGRITY_ERROR",
                    "A data integrity error occurred".to_string(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
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
