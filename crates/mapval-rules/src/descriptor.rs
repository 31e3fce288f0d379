//! # Rule Descriptors
//!
//! Declarative rule sets loaded from YAML or JSON. A descriptor mirrors the
//! builder API: each field lists a kind and any number of shape keys, and
//! conflicting shapes resolve through the usual precedence.
//!
//! ```yaml
//! strict: true
//! fields:
//!   port:
//!     enum: [80, 443]
//!   name:
//!     kind: string
//!     max: 40
//!   owner:
//!     object:
//!       fields:
//!         id: { uuid: true }
//! ```
//!
//! Manipulators cannot be described declaratively.

use std::collections::BTreeMap;
use std::path::Path;

use mapval_core::{FileConstraints, Kind, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::messages::CustomMessages;
use crate::rule::{EnumSet, Ipv4Form, Rule, Shape};
use crate::rule_set::{RuleSet, RuleSetRef, Setting};

/// Declarative form of a [`RuleSet`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDescriptor {
    #[serde(default)]
    pub strict: bool,
    pub fields: BTreeMap<String, RuleDescriptor>,
}

/// Declarative form of a [`Rule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleDescriptor {
    pub kind: Option<Kind>,
    pub nullable: bool,
    pub default: Option<serde_json::Value>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub unique: Vec<String>,
    pub required_if: Vec<String>,
    pub required_without: Vec<String>,
    pub uuid: bool,
    pub uuid_to_string: bool,
    pub email: bool,
    pub ipv4: Option<Ipv4Form>,
    pub regex: Option<String>,
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<serde_json::Value>>,
    pub file: Option<FileConstraints>,
    pub any_object: bool,
    pub object: Option<RuleSetDescriptor>,
    pub list: Option<Box<RuleDescriptor>>,
    pub list_of_objects: Option<RuleSetDescriptor>,
    pub reject_markup: bool,
    pub messages: CustomMessages,
}

impl RuleSetDescriptor {
    pub fn from_yaml_str(text: &str) -> Result<Self, RuleError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a descriptor file. The format follows the file extension.
    pub fn from_path(path: &Path) -> Result<Self, RuleError> {
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            other => Err(RuleError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Convert into a [`RuleSet`], resolving nested descriptors.
    pub fn into_rule_set(self) -> Result<RuleSet, RuleError> {
        let mut builder = RuleSet::builder();
        if self.strict {
            builder = builder.setting(Setting::strict());
        }
        for (field, descriptor) in self.fields {
            let rule = descriptor.into_rule(&field)?;
            builder = builder.rule(field, rule);
        }
        builder.try_build()
    }
}

impl RuleDescriptor {
    /// Convert into a [`Rule`] for `field`. `field` only labels errors.
    pub fn into_rule(self, field: &str) -> Result<Rule, RuleError> {
        let mut rule = Rule::kind(self.kind.unwrap_or(Kind::Any));

        if let Some(nested) = self.object {
            rule = rule.with_shape(Shape::Object(nested_ref(nested)?));
        }
        if self.any_object {
            rule = rule.with_shape(Shape::AnyObject);
        }
        if let Some(nested) = self.list_of_objects {
            rule = rule.with_shape(Shape::ListOfObject(nested_ref(nested)?));
        }
        if let Some(element) = self.list {
            let element = element.into_rule(field)?;
            rule = rule.with_shape(Shape::PrimitiveList(Box::new(element)));
        }
        if let Some(form) = self.ipv4 {
            rule = rule.with_shape(Shape::Ipv4(form));
        }
        if self.email {
            rule = rule.with_shape(Shape::Email);
        }
        if self.uuid || self.uuid_to_string {
            rule = rule.with_shape(Shape::Uuid {
                keep_string: self.uuid_to_string,
            });
        }
        if let Some(items) = self.enumeration {
            let items = items.into_iter().map(Value::from).collect();
            rule = rule.with_shape(Shape::Enum(EnumSet::new(field, items)?));
        }
        if let Some(pattern) = self.regex {
            let re = Regex::new(&pattern)
                .map_err(|source| RuleError::InvalidRegex { pattern, source })?;
            rule = rule.with_shape(Shape::Regex(re));
        }
        if let Some(constraints) = self.file {
            rule = rule.with_shape(Shape::File(constraints));
        }

        if self.nullable {
            rule = rule.nullable();
        }
        if let Some(default) = self.default {
            rule = rule.with_default(Value::from(default));
        }
        if let Some(min) = self.min {
            rule = rule.min(min);
        }
        if let Some(max) = self.max {
            rule = rule.max(max);
        }
        if self.reject_markup {
            rule = rule.reject_markup();
        }
        Ok(rule
            .unique(self.unique)
            .required_if(self.required_if)
            .required_without(self.required_without)
            .messages(self.messages))
    }
}

fn nested_ref(descriptor: RuleSetDescriptor) -> Result<RuleSetRef, RuleError> {
    Ok(RuleSetRef::from(descriptor.into_rule_set()?))
}
