//! # Recursive Evaluation
//!
//! Walks a (rule set, document) pair field by field, growing the tracking
//! tree as it goes.
//!
//! ## Order of Work per Rule Set
//!
//! 1. Strict unknown-key check over the raw document's keys.
//! 2. For each field in name order: resolve the field ([`crate::check`]),
//!    record it in the tree, classify it filled or null.
//! 3. Once the last field is classified, resolve RequiredWithout and
//!    RequiredIf for the group.
//! 4. Descend into object values, list-of-object values, and lists whose
//!    element rule is itself a container.
//!
//! Every failure returns immediately.

use mapval_core::{Document, Value};
use mapval_rules::{Rule, RuleSet, RuleSetRef, Shape};

use crate::check::check_field;
use crate::error::{ValidationError, Violation, ViolationKind};
use crate::evaluation::{Evaluation, GroupState};
use crate::resolve::resolve_presence;
use crate::tree::{Layout, NodeId};

/// Fields of one rule-set pass, split by classification.
#[derive(Debug, Default)]
pub(crate) struct GroupOutcome {
    pub filled: Vec<String>,
    pub null: Vec<String>,
}

/// Evaluate `document` against `rule_set`, attaching nodes under `parent`.
pub(crate) fn evaluate_rule_set(
    eval: &mut Evaluation,
    rule_set: &RuleSet,
    document: &Document,
    parent: NodeId,
) -> Result<GroupOutcome, ValidationError> {
    tracing::debug!(
        parent = eval.tree.node(parent).key(),
        fields = rule_set.len(),
        "evaluating rule set"
    );

    if rule_set.is_strict() {
        check_unknown_keys(rule_set, document)?;
    }

    let mut group = GroupState::new(rule_set);
    for (field, rule) in rule_set.rules() {
        let value = match check_field(field, document.get(field), rule, eval.provenance) {
            Ok(value) => value,
            Err(violation) => {
                tracing::debug!(field, message = %violation, "field rejected");
                return Err(violation.into());
            }
        };

        let node = eval.tree.add_child(parent, field);
        eval.tree.set_value(node, value.clone());
        eval.tree.attach(
            node,
            rule.unique_tags(),
            rule.custom_messages(),
            rule_set.manipulator(field),
        );

        group.classify(field, value.is_null());
        if group.is_complete() {
            resolve_presence(&group)?;
        }

        descend(eval, field, rule, &value, node)?;
    }

    let (filled, null) = group.into_fields();
    Ok(GroupOutcome { filled, null })
}

/// Recurse into the nested rule sets reachable from `rule`, under `node`.
fn descend(
    eval: &mut Evaluation,
    field: &str,
    rule: &Rule,
    value: &Value,
    node: NodeId,
) -> Result<(), ValidationError> {
    match (rule.shape(), value) {
        (Shape::Object(nested), Value::Object(doc)) => {
            let nested = defined(nested, field)?;
            evaluate_rule_set(eval, nested, doc, node)?;
        }
        (Shape::ListOfObject(nested), Value::List(items)) => {
            let nested = defined(nested, field)?;
            eval.tree.set_layout(node, Layout::List);
            for (i, item) in items.iter().enumerate() {
                let Value::Object(doc) = item else { continue };
                let element = eval.tree.add_child(node, format!("{field}[{i}]"));
                eval.tree.set_value(element, item.clone());
                evaluate_rule_set(eval, nested, doc, element)?;
            }
        }
        (Shape::PrimitiveList(element_rule), Value::List(items))
            if has_nested_rules(element_rule) =>
        {
            eval.tree.set_layout(node, Layout::List);
            for (i, item) in items.iter().enumerate() {
                let key = format!("{field}[{i}]");
                let element = eval.tree.add_child(node, key.as_str());
                eval.tree.set_value(element, item.clone());
                descend(eval, &key, element_rule, item, element)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Whether validating a value under `rule` walks into another rule set.
fn has_nested_rules(rule: &Rule) -> bool {
    match rule.shape() {
        Shape::Object(_) | Shape::ListOfObject(_) => true,
        Shape::PrimitiveList(element) => has_nested_rules(element),
        _ => false,
    }
}

fn check_unknown_keys(rule_set: &RuleSet, document: &Document) -> Result<(), Violation> {
    match document.keys().find(|key| !rule_set.contains_field(key)) {
        Some(key) => Err(Violation::new(
            ViolationKind::UnknownKey,
            key.as_str(),
            format!("'{key}' is not allowed key"),
        )),
        None => Ok(()),
    }
}

fn defined<'a>(handle: &'a RuleSetRef, field: &str) -> Result<&'a RuleSet, ValidationError> {
    handle
        .get()
        .ok_or_else(|| ValidationError::UndefinedRuleSet(field.to_string()))
}
