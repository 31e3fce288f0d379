//! # Rule Sets
//!
//! A [`RuleSet`] maps field names to [`Rule`]s, optionally attaches a
//! [`Manipulator`] per field, and carries a [`Setting`]. It is built once and
//! shared; it holds no per-evaluation state.
//!
//! ## Nesting and Self-Reference
//!
//! Object and list-of-object rules hold a [`RuleSetRef`], a shared handle,
//! rather than an inline rule set. A recursive schema is built by creating a
//! deferred handle, using it inside the rules, then defining it:
//!
//! ```
//! use mapval_rules::{Rule, RuleSet, RuleSetRef};
//!
//! let node = RuleSetRef::deferred();
//! let rules = RuleSet::builder()
//!     .rule("name", Rule::string())
//!     .rule("children", Rule::list_of_objects(node.clone()).nullable())
//!     .build();
//! node.define(rules).unwrap();
//! ```
//!
//! A self-referencing handle forms a reference cycle and is never freed.
//! Build such schemas once at startup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use mapval_core::{BoxError, Value};
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::rule::Rule;

/// Transform applied to a validated, non-null field value.
#[derive(Clone)]
pub struct Manipulator(Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>);

impl Manipulator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> Result<Value, BoxError> {
        (self.0)(value)
    }
}

impl fmt::Debug for Manipulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Manipulator(..)")
    }
}

/// Rule-set level options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Reject document keys that have no rule.
    #[serde(default)]
    pub strict: bool,
}

impl Setting {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Field rules for one level of a document.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
    manipulators: BTreeMap<String, Manipulator>,
    setting: Setting,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Rules in field-name order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn rule(&self, field: &str) -> Option<&Rule> {
        self.rules.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    pub fn manipulator(&self, field: &str) -> Option<&Manipulator> {
        self.manipulators.get(field)
    }

    pub fn setting(&self) -> Setting {
        self.setting
    }

    pub fn is_strict(&self) -> bool {
        self.setting.strict
    }

    /// Number of field rules. Never zero.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Accumulates rules, manipulators and settings into a [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: BTreeMap<String, Rule>,
    manipulators: BTreeMap<String, Manipulator>,
    setting: Setting,
}

impl RuleSetBuilder {
    /// Add or replace the rule for `field`.
    pub fn rule(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(field.into(), rule);
        self
    }

    /// Attach a transform to `field`, run after a successful validation.
    /// On an object or list field the transform receives the whole
    /// validated sub-value and its result replaces it.
    pub fn manipulator<F>(mut self, field: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.manipulators.insert(field.into(), Manipulator::new(f));
        self
    }

    pub fn setting(mut self, setting: Setting) -> Self {
        self.setting = setting;
        self
    }

    pub fn strict(mut self) -> Self {
        self.setting.strict = true;
        self
    }

    /// Finish the rule set, reporting an empty builder as an error.
    pub fn try_build(self) -> Result<RuleSet, RuleError> {
        if self.rules.is_empty() {
            return Err(RuleError::EmptyRuleSet);
        }
        for field in self.manipulators.keys() {
            if !self.rules.contains_key(field) {
                tracing::warn!(field = %field, "manipulator attached to a field without a rule");
            }
        }
        Ok(RuleSet {
            rules: self.rules,
            manipulators: self.manipulators,
            setting: self.setting,
        })
    }

    /// Finish the rule set.
    ///
    /// # Panics
    ///
    /// Panics when no rule was added. An empty rule set is a programming
    /// error, not a validation outcome; use [`RuleSetBuilder::try_build`]
    /// when the rules come from configuration.
    pub fn build(self) -> RuleSet {
        match self.try_build() {
            Ok(rule_set) => rule_set,
            Err(err) => panic!("{err}"),
        }
    }
}

/// Shared handle to a rule set, possibly defined after creation.
#[derive(Clone)]
pub struct RuleSetRef(Arc<OnceLock<RuleSet>>);

impl RuleSetRef {
    /// A handle to be defined later with [`RuleSetRef::define`].
    pub fn deferred() -> Self {
        Self(Arc::new(OnceLock::new()))
    }

    /// Define a deferred handle. Every clone of the handle observes it.
    pub fn define(&self, rule_set: RuleSet) -> Result<(), RuleError> {
        self.0.set(rule_set).map_err(|_| RuleError::AlreadyDefined)
    }

    /// The rule set, or `None` while still deferred.
    pub fn get(&self) -> Option<&RuleSet> {
        self.0.get()
    }

    pub fn is_defined(&self) -> bool {
        self.0.get().is_some()
    }
}

impl From<RuleSet> for RuleSetRef {
    fn from(rule_set: RuleSet) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(rule_set);
        Self(Arc::new(cell))
    }
}

// Prints field names only; a recursive schema would otherwise never finish.
impl fmt::Debug for RuleSetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(rule_set) => f
                .debug_tuple("RuleSetRef")
                .field(&rule_set.rules.keys().collect::<Vec<_>>())
                .finish(),
            None => f.write_str("RuleSetRef(<undefined>)"),
        }
    }
}
