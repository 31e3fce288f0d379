//! Per-call evaluation state.
//!
//! [`Evaluation`] lives for one validation call and is threaded through the
//! recursion. [`GroupState`] lives for one rule-set pass and records which
//! fields came out filled or null so that presence dependencies can be
//! resolved at the end of the group.

use std::collections::BTreeMap;

use mapval_core::Provenance;
use mapval_rules::RuleSet;

use crate::tree::TrackingTree;

/// State for one validation call.
#[derive(Debug)]
pub(crate) struct Evaluation {
    pub provenance: Provenance,
    pub tree: TrackingTree,
}

impl Evaluation {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            tree: TrackingTree::new(),
        }
    }
}

/// Bookkeeping for one rule-set pass.
#[derive(Debug)]
pub(crate) struct GroupState<'r> {
    size: usize,
    filled: Vec<String>,
    null: Vec<String>,
    /// Null field -> partners, one of which must be filled.
    required_without: BTreeMap<&'r str, &'r [String]>,
    /// Partner -> fields that become required once the partner is filled.
    required_if: BTreeMap<&'r str, Vec<&'r str>>,
}

impl<'r> GroupState<'r> {
    pub fn new(rule_set: &'r RuleSet) -> Self {
        let mut required_without = BTreeMap::new();
        let mut required_if: BTreeMap<&'r str, Vec<&'r str>> = BTreeMap::new();
        for (field, rule) in rule_set.rules() {
            if !rule.required_without_fields().is_empty() {
                required_without.insert(field, rule.required_without_fields());
            }
            for partner in rule.required_if_fields() {
                required_if.entry(partner.as_str()).or_default().push(field);
            }
        }
        Self {
            size: rule_set.len(),
            filled: Vec::new(),
            null: Vec::new(),
            required_without,
            required_if,
        }
    }

    pub fn classify(&mut self, field: &str, is_null: bool) {
        tracing::trace!(field, is_null, "field classified");
        if is_null {
            self.null.push(field.to_string());
        } else {
            self.filled.push(field.to_string());
        }
    }

    /// Every field of the rule set has been classified.
    pub fn is_complete(&self) -> bool {
        self.filled.len() + self.null.len() == self.size
    }

    pub fn is_null(&self, field: &str) -> bool {
        self.null.iter().any(|f| f == field)
    }

    /// Fields that are neither filled in this group nor known to it count as
    /// null.
    pub fn is_absent(&self, field: &str) -> bool {
        !self.filled.iter().any(|f| f == field)
    }

    pub fn filled(&self) -> &[String] {
        &self.filled
    }

    pub fn null(&self) -> &[String] {
        &self.null
    }

    pub fn required_without(&self) -> &BTreeMap<&'r str, &'r [String]> {
        &self.required_without
    }

    pub fn required_if(&self) -> &BTreeMap<&'r str, Vec<&'r str>> {
        &self.required_if
    }

    pub fn into_fields(self) -> (Vec<String>, Vec<String>) {
        (self.filled, self.null)
    }
}
