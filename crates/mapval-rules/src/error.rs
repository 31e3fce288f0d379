//! # Rule Errors
//!
//! Errors raised while building rules or loading rule descriptors. These are
//! configuration problems, distinct from validation results.

use mapval_core::Kind;
use thiserror::Error;

/// Error building a rule, rule set or descriptor.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A rule set needs at least one field rule.
    #[error("rule set requires at least one rule")]
    EmptyRuleSet,

    /// A regex shape was given a pattern that does not compile.
    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An enum shape needs at least one item.
    #[error("enum for field '{0}' has no items")]
    EmptyEnum(String),

    /// Enum items must share one kind.
    #[error("enum for field '{field}' mixes '{expected}' and '{found}' items")]
    MixedEnumKinds {
        field: String,
        expected: Kind,
        found: Kind,
    },

    /// A deferred rule set handle was defined twice.
    #[error("rule set handle is already defined")]
    AlreadyDefined,

    /// Descriptor file extension is not one of yaml, yml or json.
    #[error("unsupported descriptor format: {0}")]
    UnsupportedFormat(String),

    /// Descriptor YAML failed to parse.
    #[error("descriptor yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Descriptor JSON failed to parse.
    #[error("descriptor json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error reading a descriptor.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
