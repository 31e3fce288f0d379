//! # Form Ingestion
//!
//! Forms carry text and files only. The adapter walks the rule set, reads
//! each field from a [`FormSource`] and types it from the rule:
//!
//! | Rule shape | Form value |
//! |---|---|
//! | file | uploaded file |
//! | string | text |
//! | integer kinds | text parsed into the declared width |
//! | bool | `true` / `false` |
//!
//! Any other shape fails with [`IngestError::UnsupportedType`]. Empty text
//! counts as absent. Text that does not parse is passed through unchanged so
//! that validation reports the kind mismatch.

use std::collections::BTreeMap;

use mapval_core::{Document, FileUpload, Kind, Number, Payload, Provenance, Value};
use mapval_rules::{Rule, RuleSet, Shape};

use crate::error::IngestError;

/// Read access to submitted form fields.
pub trait FormSource {
    /// Text value of `field`, if submitted.
    fn text(&self, field: &str) -> Option<String>;

    /// Uploaded file for `field`, if submitted.
    fn file(&self, field: &str) -> Option<FileUpload>;
}

/// In-memory form fields.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    texts: BTreeMap<String, String>,
    files: BTreeMap<String, FileUpload>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.texts.insert(field.into(), value.into());
    }

    pub fn insert_file(&mut self, field: impl Into<String>, upload: FileUpload) {
        self.files.insert(field.into(), upload);
    }

    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_text(field, value);
        self
    }

    pub fn with_file(mut self, field: impl Into<String>, upload: FileUpload) -> Self {
        self.insert_file(field, upload);
        self
    }
}

impl FormSource for FormFields {
    fn text(&self, field: &str) -> Option<String> {
        self.texts.get(field).cloned()
    }

    fn file(&self, field: &str) -> Option<FileUpload> {
        self.files.get(field).cloned()
    }
}

/// Build a form payload for `rules` from `source`.
pub fn load_form(rules: &RuleSet, source: &impl FormSource) -> Result<Payload, IngestError> {
    let mut document = Document::new();
    for (field, rule) in rules.rules() {
        let value = read_field(field, rule, source)?;
        document.insert(field.to_string(), value);
    }
    Ok(Payload::new(document, Provenance::Form))
}

fn read_field(field: &str, rule: &Rule, source: &impl FormSource) -> Result<Value, IngestError> {
    let kind = match rule.shape() {
        Shape::File(_) => return Ok(source.file(field).map_or(Value::Null, Value::File)),
        Shape::Kind(kind)
            if *kind == Kind::String || *kind == Kind::Bool || kind.is_integer() =>
        {
            *kind
        }
        other => {
            tracing::debug!(field, shape = other.name(), "form field kind not supported");
            return Err(IngestError::UnsupportedType {
                field: field.to_string(),
                shape: other.name(),
            });
        }
    };

    let text = match source.text(field) {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(Value::Null),
    };
    let typed = match kind {
        Kind::Bool => text.parse::<bool>().ok().map(Value::Bool),
        Kind::String => None,
        _ => text
            .trim()
            .parse::<i128>()
            .ok()
            .and_then(|n| Number::from_integer(kind, n))
            .map(Value::Number),
    };
    Ok(typed.unwrap_or(Value::String(text)))
}
