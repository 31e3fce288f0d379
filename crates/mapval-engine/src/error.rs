//! # Validation Errors
//!
//! Every message is user-facing text. [`ViolationKind`] runs alongside the
//! text as a machine-readable category and never changes it.

use std::fmt;

use mapval_core::BoxError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent or null.
    Missing,
    /// Value kind differs from the declared kind.
    TypeMismatch,
    /// Text failed a format shape (regex, uuid, email, ipv4, object).
    Format,
    /// Value outside the enum list.
    Enum,
    /// Min/Max bound exceeded.
    Bound,
    /// Key without a rule in a strict rule set.
    UnknownKey,
    RequiredIf,
    RequiredWithout,
    /// Sibling values that must differ are equal.
    Unique,
    /// File upload failed its constraints.
    File,
    /// Text carries script-capable markup.
    Markup,
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Key the violation is reported against, e.g. `tags[2]`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Violation {}

/// Result of an unsuccessful validation call.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// First field, strictness or dependency failure. Evaluation stopped here.
    #[error("{0}")]
    Invalid(Violation),

    /// Every uniqueness violation in the document, one per line.
    #[error("{}", join_lines(.0))]
    Duplicates(Vec<Violation>),

    /// A manipulator rejected a validated value.
    #[error("{source}")]
    Manipulator {
        field: String,
        #[source]
        source: BoxError,
    },

    /// An extension hook failed.
    #[error("{0}")]
    Extension(#[source] BoxError),

    /// A nested rule set handle was never defined.
    #[error("rule set for field '{0}' is not defined")]
    UndefinedRuleSet(String),
}

impl ValidationError {
    /// Violations carried by this error, empty for non-data failures.
    pub fn violations(&self) -> Vec<&Violation> {
        match self {
            Self::Invalid(v) => vec![v],
            Self::Duplicates(vs) => vs.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Category of the first violation.
    pub fn kind(&self) -> Option<ViolationKind> {
        self.violations().first().map(|v| v.kind)
    }

    /// Whether the document itself was at fault, as opposed to the rules or
    /// a user callback.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Duplicates(_))
    }
}

impl From<Violation> for ValidationError {
    fn from(violation: Violation) -> Self {
        Self::Invalid(violation)
    }
}

fn join_lines(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failure copying a validated document into a typed record.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("bind error: {0}")]
    Deserialize(#[from] serde_json::Error),
}
