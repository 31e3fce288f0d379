//! # Semantic Kinds
//!
//! A closed set of value kinds that rules declare and values report. The
//! lowercase names returned by [`Kind::name`] appear verbatim in validation
//! messages ("the field 'port' should be 'int'"), so they are part of the
//! public contract.
//!
//! [`Provenance`] records where a document came from. It decides whether the
//! numeric family collapses into one comparable group (see [`crate::coerce`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind of a document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Accepts every value.
    Any,
    Null,
    Bool,
    /// Platform-default signed integer.
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Platform-default unsigned integer.
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Uuid,
    List,
    Object,
    File,
}

impl Kind {
    /// Name used in messages and rule descriptors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::List => "list",
            Self::Object => "object",
            Self::File => "file",
        }
    }

    /// Signed and unsigned integers of every width.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Integer or floating kinds.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a document's values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provenance {
    /// Built in code. Numbers carry their exact width.
    #[default]
    Native,
    /// Decoded from a JSON-like source. Every number is a `Float64`.
    Decoded,
    /// Parsed from form fields by the form adapter.
    Form,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lowercase() {
        assert_eq!(Kind::Int.to_string(), "int");
        assert_eq!(Kind::Float64.to_string(), "float64");
        assert_eq!(Kind::String.to_string(), "string");
    }

    #[test]
    fn test_numeric_families() {
        assert!(Kind::Uint16.is_integer());
        assert!(!Kind::Float32.is_integer());
        assert!(Kind::Float32.is_numeric());
        assert!(!Kind::String.is_numeric());
    }

    #[test]
    fn test_kind_deserializes_from_descriptor_name() {
        let kind: Kind = serde_json::from_str("\"float64\"").unwrap();
        assert_eq!(kind, Kind::Float64);
    }
}
