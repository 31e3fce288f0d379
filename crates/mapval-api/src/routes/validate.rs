//! # Validation Routes
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | POST | `/v1/validate` | JSON object |
//! | POST | `/v1/validate/form` | `multipart/form-data` |
//!
//! A valid document is answered with 200 and the materialized data plus the
//! filled and null top-level fields.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use mapval_engine::Validated;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extractors::{validate_json, validate_multipart};
use crate::state::ApiState;

/// Response body for an accepted document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidatedBody {
    pub data: serde_json::Value,
    pub filled: Vec<String>,
    pub null: Vec<String>,
}

impl From<&Validated> for ValidatedBody {
    fn from(validated: &Validated) -> Self {
        Self {
            data: validated.to_json(),
            filled: validated.filled_fields().to_vec(),
            null: validated.null_fields().to_vec(),
        }
    }
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/v1/validate", post(validate_json_body))
        .route("/v1/validate/form", post(validate_form_body))
}

async fn validate_json_body(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<ValidatedBody>, ApiError> {
    let validated = validate_json(&state.validator, &body)?;
    Ok(Json(ValidatedBody::from(&validated)))
}

async fn validate_form_body(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> Result<Json<ValidatedBody>, ApiError> {
    let validated = validate_multipart(&state.validator, multipart).await?;
    Ok(Json(ValidatedBody::from(&validated)))
}
