//! # Document Values
//!
//! The dynamically-typed value model consumed by the validation engine.
//!
//! ## Numbers
//!
//! [`Number`] keeps the exact width a value was built with. Literal `i32`
//! and `isize` values map to [`Number::Int`], the platform-default integer,
//! so `Value::from(80)` reports kind `int`. Values decoded from JSON are
//! always [`Number::Float64`] (see [`Value::decode_json`]).
//!
//! ## Serialization
//!
//! `Value` serializes to plain JSON: UUIDs as their hyphenated text, file
//! uploads as a `{file_name, content_type, size}` object, and integral
//! floats as integers so that a bound integer field accepts them.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::kind::Kind;

/// Key/value document. Keys iterate in sorted order.
pub type Document = BTreeMap<String, Value>;

/// Largest magnitude at which every integer is exactly representable in `f64`.
const F64_EXACT_INT: f64 = 9_007_199_254_740_992.0;

// ─── Number ──────────────────────────────────────────────────────────

/// A numeric value with its exact width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(u64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
}

impl Number {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::Int8(_) => Kind::Int8,
            Self::Int16(_) => Kind::Int16,
            Self::Int32(_) => Kind::Int32,
            Self::Int64(_) => Kind::Int64,
            Self::Uint(_) => Kind::Uint,
            Self::Uint8(_) => Kind::Uint8,
            Self::Uint16(_) => Kind::Uint16,
            Self::Uint32(_) => Kind::Uint32,
            Self::Uint64(_) => Kind::Uint64,
            Self::Float32(_) => Kind::Float32,
            Self::Float64(_) => Kind::Float64,
        }
    }

    /// Numeric value as `f64`. Very large 64-bit integers lose precision.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) | Self::Int64(v) => v as f64,
            Self::Int8(v) => f64::from(v),
            Self::Int16(v) => f64::from(v),
            Self::Int32(v) => f64::from(v),
            Self::Uint(v) | Self::Uint64(v) => v as f64,
            Self::Uint8(v) => f64::from(v),
            Self::Uint16(v) => f64::from(v),
            Self::Uint32(v) => f64::from(v),
            Self::Float32(v) => f64::from(v),
            Self::Float64(v) => v,
        }
    }

    /// Exact integer value, `None` for floating kinds.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::Int(v) | Self::Int64(v) => Some(i128::from(v)),
            Self::Int8(v) => Some(i128::from(v)),
            Self::Int16(v) => Some(i128::from(v)),
            Self::Int32(v) => Some(i128::from(v)),
            Self::Uint(v) | Self::Uint64(v) => Some(i128::from(v)),
            Self::Uint8(v) => Some(i128::from(v)),
            Self::Uint16(v) => Some(i128::from(v)),
            Self::Uint32(v) => Some(i128::from(v)),
            Self::Float32(_) | Self::Float64(_) => None,
        }
    }

    /// Express an integer in `kind`. `None` when `kind` is not numeric or
    /// the value does not fit.
    pub fn from_integer(kind: Kind, value: i128) -> Option<Self> {
        let number = match kind {
            Kind::Int => Self::Int(i64::try_from(value).ok()?),
            Kind::Int8 => Self::Int8(i8::try_from(value).ok()?),
            Kind::Int16 => Self::Int16(i16::try_from(value).ok()?),
            Kind::Int32 => Self::Int32(i32::try_from(value).ok()?),
            Kind::Int64 => Self::Int64(i64::try_from(value).ok()?),
            Kind::Uint => Self::Uint(u64::try_from(value).ok()?),
            Kind::Uint8 => Self::Uint8(u8::try_from(value).ok()?),
            Kind::Uint16 => Self::Uint16(u16::try_from(value).ok()?),
            Kind::Uint32 => Self::Uint32(u32::try_from(value).ok()?),
            Kind::Uint64 => Self::Uint64(u64::try_from(value).ok()?),
            Kind::Float32 => Self::Float32(value as f32),
            Kind::Float64 => Self::Float64(value as f64),
            _ => return None,
        };
        Some(number)
    }

    fn is_integral_float(value: f64) -> bool {
        value.is_finite() && value.fract() == 0.0 && value.abs() <= F64_EXACT_INT
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            other => match other.as_i128() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            },
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Float32(v) => serialize_float(f64::from(v), serializer),
            Self::Float64(v) => serialize_float(v, serializer),
            Self::Uint(v) | Self::Uint64(v) => serializer.serialize_u64(v),
            Self::Uint8(v) => serializer.serialize_u64(u64::from(v)),
            Self::Uint16(v) => serializer.serialize_u64(u64::from(v)),
            Self::Uint32(v) => serializer.serialize_u64(u64::from(v)),
            Self::Int(v) | Self::Int64(v) => serializer.serialize_i64(v),
            Self::Int8(v) => serializer.serialize_i64(i64::from(v)),
            Self::Int16(v) => serializer.serialize_i64(i64::from(v)),
            Self::Int32(v) => serializer.serialize_i64(i64::from(v)),
        }
    }
}

fn serialize_float<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if Number::is_integral_float(value) {
        serializer.serialize_i64(value as i64)
    } else {
        serializer.serialize_f64(value)
    }
}

// ─── File uploads ────────────────────────────────────────────────────

/// An uploaded file as delivered by a multipart or form source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl Serialize for FileUpload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("file_name", &self.file_name)?;
        map.serialize_entry("content_type", &self.content_type)?;
        map.serialize_entry("size", &self.size())?;
        map.end()
    }
}

// ─── Value ───────────────────────────────────────────────────────────

/// A dynamically-typed document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Uuid(Uuid),
    List(Vec<Value>),
    Object(Document),
    File(FileUpload),
}

impl Value {
    /// Semantic kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Number(n) => n.kind(),
            Self::String(_) => Kind::String,
            Self::Uuid(_) => Kind::Uuid,
            Self::List(_) => Kind::List,
            Self::Object(_) => Kind::Object,
            Self::File(_) => Kind::File,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Self::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// Convert a JSON value the way a JSON decoder hands it over: every
    /// number becomes a `Float64`.
    pub fn decode_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                Self::Number(Number::Float64(n.as_f64().unwrap_or(f64::NAN)))
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::decode_json).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::decode_json(v)))
                    .collect(),
            ),
        }
    }

    /// Plain JSON rendering of this value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Uuid(id) => serializer.collect_str(&id.hyphenated()),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(doc) => {
                let mut map = serializer.serialize_map(Some(doc.len()))?;
                for (k, v) in doc {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::File(upload) => upload.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<nil>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Uuid(id) => write!(f, "{id}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(doc) => {
                f.write_str("map[")?;
                for (i, (k, v)) in doc.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            Self::File(upload) => write!(f, "file({})", upload.file_name),
        }
    }
}

/// Integers stay integers. Used for defaults and enum items written in
/// descriptors, where `80` means the platform-default integer.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Self::Number(Number::Int(v))
                } else if let Some(v) = n.as_u64() {
                    Self::Number(Number::Uint(v))
                } else {
                    Self::Number(Number::Float64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            other => Self::decode_json(other),
        }
    }
}

macro_rules! number_from {
    ($($t:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(v: $t) -> Self {
                    Number::$variant(v as $cast)
                }
            }

            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Number(Number::from(v))
                }
            }
        )*
    };
}

number_from! {
    i32 => Int as i64,
    isize => Int as i64,
    i8 => Int8 as i8,
    i16 => Int16 as i16,
    i64 => Int64 as i64,
    usize => Uint as u64,
    u8 => Uint8 as u8,
    u16 => Uint16 as u16,
    u32 => Uint32 as u32,
    u64 => Uint64 as u64,
    f32 => Float32 as f32,
    f64 => Float64 as f64,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Value::Number(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Object(v)
    }
}

impl From<FileUpload> for Value {
    fn from(v: FileUpload) -> Self {
        Value::File(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Build a [`Document`] from `key => value` pairs.
///
/// ```
/// use mapval_core::{doc, Value};
///
/// let d = doc! { "port" => 80, "host" => "localhost" };
/// assert_eq!(d["port"], Value::from(80));
/// ```
#[macro_export]
macro_rules! doc {
    () => { $crate::Document::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::Document::new();
        $( document.insert(::std::string::String::from($key), $crate::Value::from($value)); )+
        document
    }};
}
