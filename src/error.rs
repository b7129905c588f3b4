use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::email::SendError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Article not found")]
    ArticleNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired one-time code")]
    InvalidOtp,

    #[error("Email cooldown active: {remaining_seconds}s remaining")]
    RateLimited { remaining_seconds: i64 },

    #[error("Email send failed: {0}")]
    EmailSend(#[from] SendError),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The cooldown rejection carries the remaining wait so clients can
        // show "please wait N seconds" without parsing the message.
        if let AppError::RateLimited { remaining_seconds } = self {
            let body = Json(json!({
                "error": format!(
                    "Please wait {} seconds before requesting another email",
                    remaining_seconds
                ),
                "remainingSeconds": remaining_seconds,
            }));
            return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        }

        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Transaction(ref e) => {
                tracing::error!("Transaction error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Table(ref e) => {
                tracing::error!("Table error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Commit(ref e) => {
                tracing::error!("Commit error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Deserialization(ref e) => {
                tracing::error!("Deserialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not signed in"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
            AppError::ArticleNotFound => (StatusCode::NOT_FOUND, "Article not found"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::InvalidOtp => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired one-time code",
            ),
            AppError::EmailSend(ref e) => {
                tracing::error!("Email send failed: {:?}", e);
                (StatusCode::BAD_GATEWAY, "Failed to send email")
            }
            AppError::RateLimited { .. } => unreachable!("handled above"),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
