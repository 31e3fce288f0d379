//! # API Error Types
//!
//! [`ApiError`] implements `axum::response::IntoResponse`. Ingestion failures
//! are the client's malformed input (400), failed validation is 422, and a
//! broken rule configuration is a 500 whose details stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mapval_engine::{ValidationError, ViolationKind};
use mapval_ingest::IngestError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "BAD_REQUEST", "VALIDATION_ERROR").
    pub code: String,
    /// Violation category, present for document failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ViolationKind>,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// The body could not be turned into a document (400).
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// The multipart stream was malformed (400).
    #[error("{0}")]
    Multipart(String),

    /// The document was rejected (422), or the rules are broken (500).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Ingest(_) | Self::Multipart(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(ValidationError::UndefinedRuleSet(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        }
    }

    /// Metrics label for the request outcome.
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            Self::Ingest(_) | Self::Multipart(_) => "malformed",
            Self::Validation(_) => "rejected",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "rule configuration error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };
        let kind = match &self {
            Self::Validation(err) => err.kind(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                kind,
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
