//! # Custom Messages
//!
//! Per-rule overrides for the default violation wording. Templates reference
//! named placeholders which are substituted at render time:
//!
//! | Placeholder | Meaning |
//! |---|---|
//! | `${field}` | field key |
//! | `${expected_type}` / `${actual_type}` | declared and observed kind |
//! | `${expected_length}` / `${actual_length}` | bound and observed size |
//! | `${unique_origin}` / `${unique_target}` | the two keys of a uniqueness pair |
//!
//! Unknown placeholders are left untouched.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const FIELD: &str = "field";
pub const EXPECTED_TYPE: &str = "expected_type";
pub const ACTUAL_TYPE: &str = "actual_type";
pub const EXPECTED_LENGTH: &str = "expected_length";
pub const ACTUAL_LENGTH: &str = "actual_length";
pub const UNIQUE_ORIGIN: &str = "unique_origin";
pub const UNIQUE_TARGET: &str = "unique_target";

/// Message templates that replace the default wording for one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomMessages {
    pub on_null: Option<String>,
    pub on_type_mismatch: Option<String>,
    pub on_enum_mismatch: Option<String>,
    pub on_regex: Option<String>,
    pub on_min: Option<String>,
    pub on_max: Option<String>,
    pub on_unique: Option<String>,
}

impl CustomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_null(mut self, template: impl Into<String>) -> Self {
        self.on_null = Some(template.into());
        self
    }

    pub fn on_type_mismatch(mut self, template: impl Into<String>) -> Self {
        self.on_type_mismatch = Some(template.into());
        self
    }

    pub fn on_enum_mismatch(mut self, template: impl Into<String>) -> Self {
        self.on_enum_mismatch = Some(template.into());
        self
    }

    pub fn on_regex(mut self, template: impl Into<String>) -> Self {
        self.on_regex = Some(template.into());
        self
    }

    pub fn on_min(mut self, template: impl Into<String>) -> Self {
        self.on_min = Some(template.into());
        self
    }

    pub fn on_max(mut self, template: impl Into<String>) -> Self {
        self.on_max = Some(template.into());
        self
    }

    pub fn on_unique(mut self, template: impl Into<String>) -> Self {
        self.on_unique = Some(template.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Values substituted into a message template.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: Vec<(&'static str, String)>,
}

impl Placeholders {
    /// Placeholders for a violation on `field`.
    pub fn field(field: &str) -> Self {
        Self::default().with(FIELD, field)
    }

    pub fn with(mut self, name: &'static str, value: impl Display) -> Self {
        self.values.push((name, value.to_string()));
        self
    }

    /// Substitute every known placeholder in `template`.
    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (name, value) in &self.values {
            out = out.replace(&format!("${{{name}}}"), value);
        }
        out
    }
}

/// Render `custom` when present, otherwise the default wording.
pub fn render_or(
    custom: Option<&str>,
    placeholders: &Placeholders,
    default: impl FnOnce() -> String,
) -> String {
    match custom {
        Some(template) => placeholders.render(template),
        None => default(),
    }
}
