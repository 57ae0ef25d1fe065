use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error on {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid email or password")]
    Authentication,

    #[error("Please login first")]
    SessionRequired,

    #[error("Not Found: {entity_id}")]
    NotFound { entity_id: String },

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity_id: impl ToString) -> Self {
        AppError::NotFound {
            entity_id: entity_id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::SessionRequired => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!("Error: {}: {}", status, self);

        let body = match &self {
            AppError::Validation { field, reason } => json!({
                "error": reason,
                "field": field
            }),
            AppError::NotFound { entity_id } => json!({
                "error": "Not Found",
                "entity_id": entity_id
            }),
            // Internal details stay in the log.
            AppError::Internal(_) => json!({
                "error": "Internal Server Error"
            }),
            other => json!({
                "error": other.to_string()
            }),
        };

        (status, Json(body)).into_response()
    }
}
