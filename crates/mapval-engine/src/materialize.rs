//! # Result Materialization
//!
//! [`Validated`] is the only way to obtain a validated document, so binding
//! without a successful validation pass cannot be expressed.
//!
//! Binding goes through serde: the document is rendered to JSON with null
//! entries removed, then deserialized into the target. Fields of the target
//! without a matching key keep their `#[serde(default)]`; keys without a
//! matching field are ignored unless the target denies unknown fields.

use mapval_core::{Document, Value};
use serde::de::DeserializeOwned;

use crate::error::BindError;
use crate::tree::TrackingTree;

/// A document that passed validation, with its tracking tree.
#[derive(Debug, Clone)]
pub struct Validated {
    tree: TrackingTree,
    data: Document,
    filled: Vec<String>,
    null: Vec<String>,
}

impl Validated {
    pub(crate) fn new(tree: TrackingTree, filled: Vec<String>, null: Vec<String>) -> Self {
        let data = tree.to_document();
        Self {
            tree,
            data,
            filled,
            null,
        }
    }

    /// The folded document.
    pub fn data(&self) -> &Document {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut Document {
        &mut self.data
    }

    pub fn into_data(self) -> Document {
        self.data
    }

    /// Top-level fields that resolved to a value.
    pub fn filled_fields(&self) -> &[String] {
        &self.filled
    }

    /// Top-level fields that resolved to null.
    pub fn null_fields(&self) -> &[String] {
        &self.null
    }

    pub fn tree(&self) -> &TrackingTree {
        &self.tree
    }

    pub fn to_json(&self) -> serde_json::Value {
        Value::Object(self.data.clone()).to_json()
    }

    /// Copy the validated document into `T`.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        let mut json = self.to_json();
        strip_nulls(&mut json);
        Ok(serde_json::from_value(json)?)
    }
}

fn strip_nulls(json: &mut serde_json::Value) {
    match json {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapval_core::doc;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        name: String,
        #[serde(default)]
        nickname: Option<String>,
        #[serde(default = "default_age")]
        age: u32,
    }

    fn default_age() -> u32 {
        18
    }

    fn validated(document: Document) -> Validated {
        Validated::new(TrackingTree::from_document(&document), Vec::new(), Vec::new())
    }

    #[test]
    fn test_bind_skips_null_sources() {
        let v = validated(doc! {
            "name" => "ana",
            "nickname" => Value::Null,
            "age" => Value::Null,
        });
        let profile: Profile = v.bind().unwrap();
        assert_eq!(
            profile,
            Profile {
                name: "ana".into(),
                nickname: None,
                age: 18,
            }
        );
    }

    #[test]
    fn test_bind_integral_float_into_integer() {
        let v = validated(doc! { "name" => "ana", "age" => 30.0 });
        let profile: Profile = v.bind().unwrap();
        assert_eq!(profile.age, 30);
    }

    #[test]
    fn test_bind_open_map() {
        let v = validated(doc! { "meta" => doc! { "k" => "v", "n" => 1 } });
        let out: std::collections::HashMap<String, serde_json::Value> = v.bind().unwrap();
        assert_eq!(out["meta"], json!({"k": "v", "n": 1}));
    }

    #[test]
    fn test_bind_kind_mismatch_is_error() {
        let v = validated(doc! { "name" => 5 });
        assert!(v.bind::<Profile>().is_err());
    }
}
