//! # Mutation Pipeline
//!
//! Applies field manipulators over the finished tree, parents before
//! children. Null values are skipped. The first failing manipulator stops
//! the walk.
//!
//! A manipulator on an object or list field receives the folded value of its
//! subtree, and its result replaces that subtree.

use crate::error::ValidationError;
use crate::tree::{NodeId, TrackingTree};

pub(crate) fn run_manipulators(tree: &mut TrackingTree) -> Result<(), ValidationError> {
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        apply(tree, id)?;
        stack.extend(tree.node(id).children().iter().rev().copied());
    }
    Ok(())
}

fn apply(tree: &mut TrackingTree, id: NodeId) -> Result<(), ValidationError> {
    let node = tree.node(id);
    let Some(manipulator) = node.manipulator().cloned() else {
        return Ok(());
    };
    if node.value().is_null() {
        return Ok(());
    }

    let field = node.key().to_string();
    let is_leaf = node.is_leaf();
    let input = if is_leaf {
        node.value().clone()
    } else {
        tree.fold(id)
    };
    tracing::trace!(field = %field, is_leaf, "running manipulator");
    let value = manipulator
        .apply(input)
        .map_err(|source| ValidationError::Manipulator { field, source })?;
    if is_leaf {
        tree.set_value(id, value);
    } else {
        tree.collapse(id, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapval_core::{doc, Value};
    use mapval_rules::{CustomMessages, Manipulator};

    fn with_manipulator(tree: &mut TrackingTree, key: &str, m: Manipulator) {
        let id = tree.child(tree.root(), key).unwrap();
        tree.attach(id, &[], &CustomMessages::default(), Some(&m));
    }

    #[test]
    fn test_manipulators_rewrite_values() {
        let mut tree = TrackingTree::from_document(&doc! { "name" => "ana", "age" => 3 });
        with_manipulator(
            &mut tree,
            "name",
            Manipulator::new(|v| Ok(Value::from(format!("{v}!")))),
        );
        run_manipulators(&mut tree).unwrap();
        assert_eq!(tree.to_document(), doc! { "name" => "ana!", "age" => 3 });
    }

    #[test]
    fn test_object_manipulator_replaces_subtree() {
        let mut tree = TrackingTree::from_document(&doc! { "o" => doc! { "x" => 1 }, "n" => 2 });
        let x = tree.child(tree.child(tree.root(), "o").unwrap(), "x").unwrap();
        tree.attach(
            x,
            &[],
            &CustomMessages::default(),
            Some(&Manipulator::new(|_| Err("detached".into()))),
        );
        with_manipulator(
            &mut tree,
            "o",
            Manipulator::new(|v| {
                assert_eq!(v, Value::Object(doc! { "x" => 1 }));
                Ok(Value::from("replaced"))
            }),
        );
        run_manipulators(&mut tree).unwrap();
        assert_eq!(tree.to_document(), doc! { "o" => "replaced", "n" => 2 });
    }

    #[test]
    fn test_null_values_are_skipped() {
        let mut tree = TrackingTree::from_document(&doc! { "name" => Value::Null });
        with_manipulator(&mut tree, "name", Manipulator::new(|_| Err("never".into())));
        assert!(run_manipulators(&mut tree).is_ok());
    }

    #[test]
    fn test_failure_stops_the_walk() {
        let mut tree = TrackingTree::from_document(&doc! { "a" => 1, "b" => 2 });
        with_manipulator(&mut tree, "a", Manipulator::new(|_| Err("bad a".into())));
        with_manipulator(&mut tree, "b", Manipulator::new(|_| Ok(Value::from(20))));
        let err = run_manipulators(&mut tree).unwrap_err();
        assert_eq!(err.to_string(), "bad a");
        assert_eq!(tree.to_document()["b"], Value::from(2));
    }
}
