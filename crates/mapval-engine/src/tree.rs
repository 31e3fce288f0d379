//! # Tracking Tree
//!
//! A mutable tree mirroring the validated document. The engine grows it while
//! descending, the resolvers and the mutation pipeline read and rewrite it,
//! and [`TrackingTree::to_document`] folds it back into a [`Document`].
//!
//! ## Storage
//!
//! Nodes live in one arena vector and refer to each other by [`NodeId`].
//! Children are owned through the arena; the parent link is a plain index.
//! A tree lives for one validation call.
//!
//! ## Folding
//!
//! A childless node contributes its own value. A node with children
//! contributes a sub-document built from them, or an ordered list when the
//! node was laid out as a list (list-of-object fields).

use std::fmt::Write as _;

use mapval_core::{Document, Value};
use mapval_rules::{CustomMessages, Manipulator};

/// Key of the synthetic root node.
pub const ROOT_KEY: &str = "root";

/// Index of a node in a [`TrackingTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// How an internal node folds its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Object,
    List,
}

/// One validated field occurrence.
#[derive(Debug, Clone)]
pub struct TrackingNode {
    key: String,
    value: Value,
    uniques: Vec<String>,
    messages: CustomMessages,
    manipulator: Option<Manipulator>,
    errors: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layout: Layout,
}

impl TrackingNode {
    fn new(key: String, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value: Value::Null,
            uniques: Vec::new(),
            messages: CustomMessages::default(),
            manipulator: None,
            errors: Vec::new(),
            parent,
            children: Vec::new(),
            layout: Layout::Object,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn uniques(&self) -> &[String] {
        &self.uniques
    }

    pub fn messages(&self) -> &CustomMessages {
        &self.messages
    }

    pub fn manipulator(&self) -> Option<&Manipulator> {
        self.manipulator.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed tree of [`TrackingNode`]s.
#[derive(Debug, Clone)]
pub struct TrackingTree {
    nodes: Vec<TrackingNode>,
}

impl Default for TrackingTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingTree {
    /// A tree holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrackingNode::new(ROOT_KEY.to_string(), None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TrackingNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TrackingNode {
        &mut self.nodes[id.0]
    }

    /// Append a child named `key` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, key: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TrackingNode::new(key.into(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_value(&mut self, id: NodeId, value: Value) {
        self.nodes[id.0].value = value;
    }

    pub(crate) fn set_layout(&mut self, id: NodeId, layout: Layout) {
        self.nodes[id.0].layout = layout;
    }

    pub(crate) fn attach(
        &mut self,
        id: NodeId,
        uniques: &[String],
        messages: &CustomMessages,
        manipulator: Option<&Manipulator>,
    ) {
        let node = &mut self.nodes[id.0];
        node.uniques = uniques.to_vec();
        node.messages = messages.clone();
        node.manipulator = manipulator.cloned();
    }

    /// Replace the subtree under `id` with a single value. Detached
    /// descendants stay in the arena but are no longer reachable.
    pub(crate) fn collapse(&mut self, id: NodeId, value: Value) {
        let node = &mut self.nodes[id.0];
        node.children.clear();
        node.layout = Layout::Object;
        node.value = value;
    }

    pub(crate) fn push_error(&mut self, id: NodeId, message: String) {
        self.nodes[id.0].errors.push(message);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// First child of `id` named `key`.
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).key == key)
    }

    /// Keys from the root down to the parent of `id`.
    pub fn ancestor_keys(&self, id: NodeId) -> Vec<&str> {
        let mut keys = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(p) = current {
            keys.push(self.node(p).key.as_str());
            current = self.node(p).parent;
        }
        keys.reverse();
        keys
    }

    /// Nodes sharing `id`'s parent under a different key.
    pub fn siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let key = self.node(id).key.as_str();
        let children = match self.node(id).parent {
            Some(p) => self.node(p).children.as_slice(),
            None => &[],
        };
        children
            .iter()
            .copied()
            .filter(move |&c| self.node(c).key != key)
    }

    /// Node ids in pre-order: parent before children, children in insertion
    /// order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    /// Every key in pre-order, root included.
    pub fn all_keys(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .map(|id| self.node(id).key.as_str())
            .collect()
    }

    /// Errors accumulated on nodes, in pre-order.
    pub fn errors(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .flat_map(|id| self.node(id).errors.iter().map(String::as_str))
            .collect()
    }

    /// Build a tree straight from a document, without validation. Nested
    /// objects become internal nodes; every other value is a leaf.
    pub fn from_document(document: &Document) -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        tree.load(root, document);
        tree
    }

    fn load(&mut self, parent: NodeId, document: &Document) {
        for (key, value) in document {
            let child = self.add_child(parent, key.as_str());
            self.set_value(child, value.clone());
            if let Value::Object(nested) = value {
                self.load(child, nested);
            }
        }
    }

    /// Fold the tree back into a document.
    pub fn to_document(&self) -> Document {
        match self.fold(self.root()) {
            Value::Object(document) => document,
            _ => Document::new(),
        }
    }

    /// Fold the subtree rooted at `id` into one value.
    pub fn fold(&self, id: NodeId) -> Value {
        let node = self.node(id);
        if node.children.is_empty() {
            return node.value.clone();
        }
        match node.layout {
            Layout::List => Value::List(node.children.iter().map(|&c| self.fold(c)).collect()),
            Layout::Object => Value::Object(
                node.children
                    .iter()
                    .map(|&c| (self.node(c).key.clone(), self.fold(c)))
                    .collect(),
            ),
        }
    }

    /// One `path : value` line per node, paths joined by `separator`.
    /// Internal nodes print their path only.
    pub fn render_hierarchy(&self, separator: &str) -> String {
        let mut out = String::new();
        self.render_node(self.root(), separator, "", &mut out);
        out
    }

    fn render_node(&self, id: NodeId, separator: &str, prefix: &str, out: &mut String) {
        let node = self.node(id);
        let path = if prefix.is_empty() {
            node.key.clone()
        } else {
            format!("{prefix}{separator}{}", node.key)
        };
        if node.is_leaf() && !node.value.is_null() {
            let _ = writeln!(out, "{path} : {}", node.value);
        } else {
            let _ = writeln!(out, "{path}");
        }
        for &child in &node.children {
            self.render_node(child, separator, &path, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapval_core::doc;
    use proptest::prelude::*;

    fn sample() -> Document {
        doc! {
            "name" => "ana",
            "age" => 30,
            "address" => doc! {
                "city" => "Oslo",
                "geo" => doc! { "lat" => 59.9, "lng" => 10.7 },
            },
            "tags" => vec!["a", "b"],
            "empty" => Document::new(),
            "missing" => Value::Null,
        }
    }

    #[test]
    fn test_round_trip_reproduces_document() {
        let document = sample();
        assert_eq!(TrackingTree::from_document(&document).to_document(), document);
    }

    #[test]
    fn test_navigation() {
        let tree = TrackingTree::from_document(&sample());
        let root = tree.root();
        let address = tree.child(root, "address").unwrap();
        let geo = tree.child(address, "geo").unwrap();
        let lat = tree.child(geo, "lat").unwrap();

        assert_eq!(tree.parent(lat), Some(geo));
        assert_eq!(tree.ancestor_keys(lat), ["root", "address", "geo"]);
        assert_eq!(tree.node(lat).value(), &Value::from(59.9));

        let siblings: Vec<_> = tree.siblings(lat).map(|id| tree.node(id).key()).collect();
        assert_eq!(siblings, ["lng"]);
        assert!(tree.siblings(root).next().is_none());
    }

    #[test]
    fn test_list_layout_folds_to_list() {
        let mut tree = TrackingTree::new();
        let root = tree.root();
        let items = tree.add_child(root, "items");
        tree.set_layout(items, Layout::List);
        for (i, name) in ["x", "y"].iter().enumerate() {
            let element = tree.add_child(items, format!("items[{i}]"));
            let field = tree.add_child(element, "name");
            tree.set_value(field, Value::from(*name));
        }

        let expected = doc! {
            "items" => vec![doc! { "name" => "x" }, doc! { "name" => "y" }],
        };
        assert_eq!(tree.to_document(), expected);
    }

    #[test]
    fn test_preorder_and_keys() {
        let tree = TrackingTree::from_document(&doc! { "b" => doc! { "c" => 1 }, "a" => 2 });
        assert_eq!(tree.all_keys(), ["root", "a", "b", "c"]);
    }

    #[test]
    fn test_render_hierarchy() {
        let tree = TrackingTree::from_document(&doc! { "user" => doc! { "name" => "ana" } });
        assert_eq!(tree.render_hierarchy("."), "root\nroot.user\nroot.user.name : ana\n");
    }

    #[test]
    fn test_errors_collected_in_preorder() {
        let mut tree = TrackingTree::from_document(&doc! { "a" => 1, "b" => 2 });
        let b = tree.child(tree.root(), "b").unwrap();
        let a = tree.child(tree.root(), "a").unwrap();
        tree.push_error(b, "second".into());
        tree.push_error(a, "first".into());
        assert_eq!(tree.errors(), ["first", "second"]);
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::Object),
            ]
        })
    }

    proptest! {
        #[test]
        fn test_round_trip_any_document(
            document in prop::collection::btree_map("[a-z]{1,4}", arb_value(), 0..6)
        ) {
            prop_assert_eq!(TrackingTree::from_document(&document).to_document(), document);
        }
    }
}
