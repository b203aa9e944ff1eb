//! Error Taxonomy
//!
//! Every request or command handler converts failures into one of these
//! variants at its boundary; nothing here is allowed to bring the process down.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed required input. State is left untouched.
    #[error("{0}")]
    Validation(String),

    /// Unknown song or announcement id. State is left untouched.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Store or I/O failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn song_not_found(id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity: "song",
            id: id.into(),
        }
    }

    pub fn announcement_not_found(id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity: "announcement",
            id: id.into(),
        }
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound { .. } => "not_found",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

// Malformed bodies and query strings are validation errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// JSON body of every error response, and payload of the `error` session event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(e) => tracing::error!("Request failed: {:#}", e),
            other => tracing::debug!("Request rejected: {}", other),
        }
        (self.status(), Json(self.to_body())).into_response()
    }
}
