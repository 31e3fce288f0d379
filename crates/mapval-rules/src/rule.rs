//! # Rules and Shapes
//!
//! A [`Rule`] constrains one field. It has exactly one [`Shape`], the primary
//! constraint, plus modifiers that combine freely with most shapes.
//!
//! ## Shape Precedence
//!
//! Applying a second shape to a rule keeps whichever ranks higher:
//!
//! ```text
//! File > Regex > Enum > UUID > Email > IPv4 > List > Object > Kind
//! ```
//!
//! ## Building
//!
//! ```
//! use mapval_rules::Rule;
//!
//! let port = Rule::enumeration([80, 443]);
//! let name = Rule::string().min(3).max(40);
//! let nickname = Rule::string().nullable().max(12);
//! # let _ = (port, name, nickname);
//! ```

use std::fmt;

use mapval_core::{FileConstraints, Kind, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::messages::CustomMessages;
use crate::rule_set::RuleSetRef;

/// Accepted IPv4 spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ipv4Form {
    /// Dotted quad.
    Plain,
    /// Dotted quad with an optional `/0`..`/32` suffix.
    OptionalPrefix,
    /// Dotted quad whose last octet is zero.
    Network,
}

/// The allowed values of an enum shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSet {
    items: Vec<Value>,
    kind: Kind,
}

impl EnumSet {
    /// Build an enum set, rejecting empty or mixed-kind item lists.
    pub fn new(field: &str, items: Vec<Value>) -> Result<Self, RuleError> {
        let first = items
            .first()
            .ok_or_else(|| RuleError::EmptyEnum(field.to_string()))?
            .kind();
        if let Some(other) = items.iter().find(|item| item.kind() != first) {
            return Err(RuleError::MixedEnumKinds {
                field: field.to_string(),
                expected: first,
                found: other.kind(),
            });
        }
        Ok(Self { items, kind: first })
    }

    /// Build without checks. The declared kind is the first item's kind.
    pub fn from_items(items: Vec<Value>) -> Self {
        let kind = items.first().map_or(Kind::Any, Value::kind);
        Self { items, kind }
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Declared element kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }
}

impl fmt::Display for EnumSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::List(self.items.clone()))
    }
}

/// Primary constraint of a rule.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Plain kind check.
    Kind(Kind),
    /// Any object, kept as-is.
    AnyObject,
    /// Nested document validated by a rule set.
    Object(RuleSetRef),
    /// List whose elements are documents validated by a rule set.
    ListOfObject(RuleSetRef),
    /// List whose elements are validated by a scalar rule.
    PrimitiveList(Box<Rule>),
    Ipv4(Ipv4Form),
    /// Text containing `@` with a dotted domain part.
    Email,
    /// UUID text. With `keep_string` the text is kept instead of the parsed id.
    Uuid { keep_string: bool },
    Enum(EnumSet),
    Regex(Regex),
    File(FileConstraints),
}

impl Shape {
    /// Rank used to resolve two shapes set on one rule. Higher wins.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::File(_) => 8,
            Self::Regex(_) => 7,
            Self::Enum(_) => 6,
            Self::Uuid { .. } => 5,
            Self::Email => 4,
            Self::Ipv4(_) => 3,
            Self::PrimitiveList(_) | Self::ListOfObject(_) => 2,
            Self::Object(_) | Self::AnyObject => 1,
            Self::Kind(_) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Kind(kind) => kind.name(),
            Self::AnyObject => "any_object",
            Self::Object(_) => "object",
            Self::ListOfObject(_) => "list_of_objects",
            Self::PrimitiveList(_) => "list",
            Self::Ipv4(_) => "ipv4",
            Self::Email => "email",
            Self::Uuid { .. } => "uuid",
            Self::Enum(_) => "enum",
            Self::Regex(_) => "regex",
            Self::File(_) => "file",
        }
    }
}

/// Constraint for a single field.
#[derive(Debug, Clone)]
pub struct Rule {
    shape: Shape,
    nullable: bool,
    default: Option<Value>,
    min: Option<i64>,
    max: Option<i64>,
    unique: Vec<String>,
    required_if: Vec<String>,
    required_without: Vec<String>,
    messages: CustomMessages,
    reject_markup: bool,
}

impl Rule {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            nullable: false,
            default: None,
            min: None,
            max: None,
            unique: Vec::new(),
            required_if: Vec::new(),
            required_without: Vec::new(),
            messages: CustomMessages::default(),
            reject_markup: false,
        }
    }

    // ── shapes ──

    pub fn kind(kind: Kind) -> Self {
        Self::new(Shape::Kind(kind))
    }

    pub fn string() -> Self {
        Self::kind(Kind::String)
    }

    /// Platform-default integer.
    pub fn int() -> Self {
        Self::kind(Kind::Int)
    }

    pub fn float() -> Self {
        Self::kind(Kind::Float64)
    }

    pub fn boolean() -> Self {
        Self::kind(Kind::Bool)
    }

    /// Bare list of anything. Non-nullable bare lists must not be empty.
    pub fn list() -> Self {
        Self::kind(Kind::List)
    }

    pub fn any() -> Self {
        Self::kind(Kind::Any)
    }

    /// UUID text, stored as the parsed identifier.
    pub fn uuid() -> Self {
        Self::new(Shape::Uuid { keep_string: false })
    }

    /// UUID text, validated but stored as text.
    pub fn uuid_string() -> Self {
        Self::new(Shape::Uuid { keep_string: true })
    }

    pub fn email() -> Self {
        Self::new(Shape::Email)
    }

    pub fn ipv4() -> Self {
        Self::new(Shape::Ipv4(Ipv4Form::Plain))
    }

    pub fn ipv4_with_prefix() -> Self {
        Self::new(Shape::Ipv4(Ipv4Form::OptionalPrefix))
    }

    pub fn ipv4_network() -> Self {
        Self::new(Shape::Ipv4(Ipv4Form::Network))
    }

    /// Value must equal one of `items`. The first item fixes the element kind.
    pub fn enumeration<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let items = items.into_iter().map(Into::into).collect();
        Self::new(Shape::Enum(EnumSet::from_items(items)))
    }

    /// Text matching `pattern`.
    pub fn regex(pattern: &str) -> Result<Self, RuleError> {
        let re = Regex::new(pattern).map_err(|source| RuleError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::matching(re))
    }

    /// Text matching an already compiled expression.
    pub fn matching(re: Regex) -> Self {
        Self::new(Shape::Regex(re))
    }

    pub fn file(constraints: FileConstraints) -> Self {
        Self::new(Shape::File(constraints))
    }

    /// Nested document validated by `rules`.
    pub fn object(rules: impl Into<RuleSetRef>) -> Self {
        Self::new(Shape::Object(rules.into()))
    }

    pub fn any_object() -> Self {
        Self::new(Shape::AnyObject)
    }

    /// List whose elements each satisfy `element`.
    pub fn list_of(element: Rule) -> Self {
        Self::new(Shape::PrimitiveList(Box::new(element)))
    }

    /// List whose elements are documents validated by `rules`.
    pub fn list_of_objects(rules: impl Into<RuleSetRef>) -> Self {
        Self::new(Shape::ListOfObject(rules.into()))
    }

    /// Apply another shape. The higher-precedence shape is kept; on a tie
    /// the new shape replaces the old one.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        if shape.precedence() >= self.shape.precedence() {
            self.shape = shape;
        }
        self
    }

    // ── modifiers ──

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value used when the field is absent. Implies [`Rule::nullable`].
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.nullable = true;
        self.default = Some(value.into());
        self
    }

    /// Lower bound: code points for text, value for numbers, length for lists.
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Upper bound, measured like [`Rule::min`].
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sibling fields whose values must differ from this one.
    pub fn unique<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_deduped(&mut self.unique, fields);
        self
    }

    /// This field becomes required once any of `fields` is filled.
    pub fn required_if<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_deduped(&mut self.required_if, fields);
        self
    }

    /// This field is required when every one of `fields` is absent.
    pub fn required_without<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_deduped(&mut self.required_without, fields);
        self
    }

    pub fn messages(mut self, messages: CustomMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Reject text that looks like script-capable markup.
    pub fn reject_markup(mut self) -> Self {
        self.reject_markup = true;
        self
    }

    // ── accessors ──

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn min_bound(&self) -> Option<i64> {
        self.min
    }

    pub fn max_bound(&self) -> Option<i64> {
        self.max
    }

    pub fn unique_tags(&self) -> &[String] {
        &self.unique
    }

    pub fn required_if_fields(&self) -> &[String] {
        &self.required_if
    }

    pub fn required_without_fields(&self) -> &[String] {
        &self.required_without
    }

    /// Whether absence of this field is decided by sibling presence.
    pub fn has_presence_dependency(&self) -> bool {
        !self.required_if.is_empty() || !self.required_without.is_empty()
    }

    pub fn custom_messages(&self) -> &CustomMessages {
        &self.messages
    }

    pub fn rejects_markup(&self) -> bool {
        self.reject_markup
    }
}

fn extend_deduped<I, S>(target: &mut Vec<String>, fields: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for field in fields {
        let field = field.into();
        if !target.contains(&field) {
            target.push(field);
        }
    }
}
