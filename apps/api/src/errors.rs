use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::grading::GradingError;
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

    #[error("Forbidden")]
    Forbidden,

    /// Feature locked for the caller's tier; the client should show the
    /// upsell prompt instead of performing the action.
    #[error("Upgrade required")]
    UpgradeRequired,

    /// Credits exhausted; the client should redirect to the store.
    #[error("Credits exhausted")]
    CreditsExhausted,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Grading error: {0}")]
    Grading(#[from] GradingError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
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
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::UpgradeRequired => (
                StatusCode::FORBIDDEN,
                "UPGRADE_REQUIRED",
                "This feature is not included in your current plan".to_string(),
            ),
            AppError::CreditsExhausted => (
                StatusCode::PAYMENT_REQUIRED,
                "CREDITS_EXHAUSTED",
                "No corrections left on your plan. Visit the store to continue".to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Grading(e) => {
                tracing::error!("Grading error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GRADING_ERROR",
                    "Essay correction failed. Please try again".to_string(),
                )
            }
            AppError::Auth(e) => {
                if let AuthError::Rejected { status, message } = e {
                    tracing::warn!("Auth service rejected request ({status}): {message}");
                    (StatusCode::UNAUTHORIZED, "AUTH_REJECTED", message.clone())
                } else {
                    tracing::error!("Auth error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "AUTH_ERROR",
                        "The authentication service is unavailable".to_string(),
                    )
                }
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
