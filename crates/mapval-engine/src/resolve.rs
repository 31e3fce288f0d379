//! # Cross-Node Resolvers
//!
//! Two constraints span several fields and cannot be decided while looking
//! at one field:
//!
//! - **Presence dependencies** (RequiredWithout, RequiredIf) are resolved
//!   per rule set, once every field of the group is classified. They fail
//!   fast like field checks.
//! - **Uniqueness** is resolved once over the finished tree. It compares each
//!   tagged node with its siblings and accumulates every violation.
//!
//! A uniqueness pair is reported once. The origin is whichever node of the
//! pair comes first in tree order, which follows field-name order within a
//! rule set.

use std::collections::HashSet;

use mapval_rules::messages::{render_or, Placeholders, UNIQUE_ORIGIN, UNIQUE_TARGET};

use crate::error::{Violation, ViolationKind};
use crate::evaluation::GroupState;
use crate::tree::{NodeId, TrackingTree};

/// Resolve RequiredWithout, then RequiredIf, for a completed group.
pub(crate) fn resolve_presence(group: &GroupState<'_>) -> Result<(), Violation> {
    for field in group.null() {
        let Some(partners) = group.required_without().get(field.as_str()) else {
            continue;
        };
        if partners.iter().all(|partner| group.is_absent(partner)) {
            return Err(Violation::new(
                ViolationKind::RequiredWithout,
                field.as_str(),
                format!(
                    "if field '{field}' is null you need to put value in this field or in [{}]",
                    partners.join(" ")
                ),
            ));
        }
    }

    for field in group.filled() {
        let Some(dependents) = group.required_if().get(field.as_str()) else {
            continue;
        };
        if dependents.iter().all(|dependent| group.is_null(dependent)) {
            return Err(Violation::new(
                ViolationKind::RequiredIf,
                field.as_str(),
                format!(
                    "if field '{field}' is filled you need to put value in [{}]",
                    dependents.join(" ")
                ),
            ));
        }
    }
    Ok(())
}

/// Compare every unique-tagged node against its matching siblings. Each
/// violation is appended to the origin node's errors and returned.
pub(crate) fn resolve_uniqueness(tree: &mut TrackingTree) -> Vec<Violation> {
    let mut reported: HashSet<(NodeId, NodeId)> = HashSet::new();
    let mut found: Vec<(NodeId, Violation)> = Vec::new();

    for id in tree.preorder() {
        let node = tree.node(id);
        if node.uniques().is_empty() || node.value().is_null() {
            continue;
        }
        for sibling in tree.siblings(id) {
            let other = tree.node(sibling);
            if other.value().is_null()
                || !node.uniques().iter().any(|tag| tag == other.key())
                || other.value() != node.value()
            {
                continue;
            }
            let pair = if id < sibling { (id, sibling) } else { (sibling, id) };
            if !reported.insert(pair) {
                continue;
            }

            let (origin, target) = (node.key(), other.key());
            let placeholders = Placeholders::field(origin)
                .with(UNIQUE_ORIGIN, origin)
                .with(UNIQUE_TARGET, target);
            let message = render_or(node.messages().on_unique.as_deref(), &placeholders, || {
                format!("value of '{origin}' and '{target}' fields must be different")
            });
            found.push((id, Violation::new(ViolationKind::Unique, origin, message)));
        }
    }

    for (id, violation) in &found {
        tree.push_error(*id, violation.message.clone());
    }
    if !found.is_empty() {
        tracing::debug!(count = found.len(), "uniqueness violations");
    }
    found.into_iter().map(|(_, violation)| violation).collect()
}
