//! # Request Validation Helpers
//!
//! Turn a raw request body into a [`Validated`] document. Handlers call these
//! directly with the body they extracted:
//!
//! ```ignore
//! async fn handler(State(state): State<ApiState>, body: Bytes) -> Result<..., ApiError> {
//!     let validated = validate_json(&state.validator, &body)?;
//!     let signup: Signup = validated.bind()?;
//! }
//! ```
//!
//! Every call increments `mapval_requests_total` labelled with its outcome.

use axum::extract::Multipart;
use mapval_core::FileUpload;
use mapval_engine::tree::ROOT_KEY;
use mapval_engine::{Validated, ValidationError, Validator};
use mapval_ingest::{load_form, load_json, FormFields};

use crate::error::ApiError;

/// Validate a JSON request body.
pub fn validate_json(validator: &Validator, body: &[u8]) -> Result<Validated, ApiError> {
    let result = load_json(body)
        .map_err(ApiError::from)
        .and_then(|payload| validator.validate(payload).map_err(ApiError::from));
    record(result)
}

/// Validate a multipart form body. Only fields named by the rule set are read.
pub async fn validate_multipart(
    validator: &Validator,
    multipart: Multipart,
) -> Result<Validated, ApiError> {
    let result = match collect_form(multipart).await {
        Ok(fields) => validate_form(validator, &fields),
        Err(err) => Err(err),
    };
    record(result)
}

fn validate_form(validator: &Validator, fields: &FormFields) -> Result<Validated, ApiError> {
    let rules = validator
        .rules()
        .ok_or_else(|| ValidationError::UndefinedRuleSet(ROOT_KEY.to_string()))?;
    let payload = load_form(rules, fields)?;
    Ok(validator.validate(payload)?)
}

async fn collect_form(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut fields = FormFields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Multipart(err.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::Multipart(err.body_text()))?;
                let mut upload = FileUpload::new(file_name, bytes.to_vec());
                if let Some(content_type) = content_type {
                    upload = upload.with_content_type(content_type);
                }
                fields.insert_file(name, upload);
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::Multipart(err.body_text()))?;
                fields.insert_text(name, text);
            }
        }
    }
    Ok(fields)
}

fn record(result: Result<Validated, ApiError>) -> Result<Validated, ApiError> {
    let outcome = match &result {
        Ok(_) => "accepted",
        Err(err) => {
            tracing::warn!(error = %err, outcome = err.outcome(), "request rejected");
            err.outcome()
        }
    };
    metrics::counter!("mapval_requests_total", "outcome" => outcome).increment(1);
    result
}
