//! # Validator
//!
//! Entry point tying the engine together. One [`Validator`] wraps a rule set
//! and can serve any number of calls, concurrently if needed: each call
//! builds its own tree and bookkeeping.
//!
//! ## Pipeline
//!
//! ```text
//! before_validation hooks
//!   -> recursive evaluation (fail-fast)
//!   -> uniqueness resolver (accumulating)
//!   -> mutation pipeline (fail-fast)
//!   -> fold into Validated
//!   -> after_validation hooks
//! ```

use mapval_core::{BoxError, Document, Payload, Provenance, Value};
use mapval_rules::{Rule, RuleSet, RuleSetRef};

use crate::engine::evaluate_rule_set;
use crate::error::ValidationError;
use crate::evaluation::Evaluation;
use crate::materialize::Validated;
use crate::mutate::run_manipulators;
use crate::resolve::resolve_uniqueness;

/// Key used by [`validate_one`] for the bare value.
pub const SINGLE_VALUE_KEY: &str = "data";

/// Hooks around a validation call.
///
/// Hooks run in registration order. A failing hook aborts the call with
/// [`ValidationError::Extension`].
pub trait Extension: Send + Sync {
    /// Inspect or rewrite the raw document before evaluation.
    fn before_validation(&self, _document: &mut Document) -> Result<(), BoxError> {
        Ok(())
    }

    /// Inspect or rewrite the validated document.
    fn after_validation(&self, _document: &mut Document) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Validates documents against one rule set.
pub struct Validator {
    rules: RuleSetRef,
    extensions: Vec<Box<dyn Extension>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl Validator {
    pub fn new(rules: impl Into<RuleSetRef>) -> Self {
        Self {
            rules: rules.into(),
            extensions: Vec::new(),
        }
    }

    /// Register an extension.
    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// The rule set, or `None` if built from a handle never defined.
    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.get()
    }

    /// Validate a document built in code.
    pub fn validate_document(&self, document: Document) -> Result<Validated, ValidationError> {
        self.validate(Payload::native(document))
    }

    /// Validate a document with its provenance.
    pub fn validate(&self, payload: Payload) -> Result<Validated, ValidationError> {
        let Payload {
            mut document,
            provenance,
        } = payload;
        let rules = self
            .rules
            .get()
            .ok_or_else(|| ValidationError::UndefinedRuleSet(crate::tree::ROOT_KEY.to_string()))?;

        for extension in &self.extensions {
            extension
                .before_validation(&mut document)
                .map_err(ValidationError::Extension)?;
        }

        let mut eval = Evaluation::new(provenance);
        let root = eval.tree.root();
        let outcome = evaluate_rule_set(&mut eval, rules, &document, root)?;

        let duplicates = resolve_uniqueness(&mut eval.tree);
        if !duplicates.is_empty() {
            return Err(ValidationError::Duplicates(duplicates));
        }

        run_manipulators(&mut eval.tree)?;

        let mut validated = Validated::new(eval.tree, outcome.filled, outcome.null);
        for extension in &self.extensions {
            extension
                .after_validation(validated.data_mut())
                .map_err(ValidationError::Extension)?;
        }

        tracing::debug!(
            filled = validated.filled_fields().len(),
            null = validated.null_fields().len(),
            "document validated"
        );
        Ok(validated)
    }
}

/// Validate a bare value against `rule`. Violations name the value `data`.
pub fn validate_one(
    rule: Rule,
    value: Value,
    provenance: Provenance,
) -> Result<Value, ValidationError> {
    let rules = RuleSet::builder().rule(SINGLE_VALUE_KEY, rule).build();
    let mut document = Document::new();
    document.insert(SINGLE_VALUE_KEY.to_string(), value);
    let validated = Validator::new(rules).validate(Payload::new(document, provenance))?;
    Ok(validated
        .into_data()
        .remove(SINGLE_VALUE_KEY)
        .unwrap_or(Value::Null))
}
