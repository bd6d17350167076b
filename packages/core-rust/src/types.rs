use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Generic host value handed to a resolver as its lookup key.
///
/// Models everything a host's dynamic-invocation layer can pass through a
/// generic keyed-lookup call: plain scalars, host-wrapped items, and ordered
/// collections. Only scalars and flat sequences of scalars are meaningful
/// keys; the remaining shapes exist so that the normalizer can reject them
/// with a precise type name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent key.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar (signed 64-bit).
    Int(i64),
    /// Floating-point scalar (64-bit IEEE 754).
    Float(f64),
    /// UTF-8 string scalar.
    String(String),
    /// Host-wrapped item (e.g. a document node). Its string value is the
    /// wrapped text content.
    Node(String),
    /// Raw binary data. Not a valid key.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Keyed collection. Not a valid key.
    /// Uses `BTreeMap` for deterministic serialization order.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Concrete shape name, reported when a value cannot be used as a key.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Node(_) => "node",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Whether this value is a single scalar (including host-wrapped items).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::String(_) | Self::Node(_)
        )
    }

    /// String representation of a scalar-like value.
    ///
    /// Returns `None` for shapes that have no token form (`Bytes`, `Array`,
    /// `Map`). `Null` renders as the empty string, matching how hosts
    /// stringify an absent item inside a sequence.
    #[must_use]
    pub fn as_token(&self) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) | Self::Node(s) => Some(s.clone()),
            Self::Bytes(_) | Self::Array(_) | Self::Map(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Successful value produced by a resolver call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Textual value (also used for base64-encoded binary content).
    Text(String),
    /// Raw binary content.
    Binary(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Ordered sequence of textual values.
    List(Vec<String>),
    /// The backing service had no value for the request.
    Empty,
}

impl Payload {
    /// Returns the text content, if this payload is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Requested representation of a partner directory parameter.
///
/// Parsed from the optional trailing token of a `Parameter` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Textual parameter value.
    #[default]
    String,
    /// Raw binary parameter value.
    BinaryData,
    /// Binary parameter value re-encoded as base64 text.
    BinaryDataB64,
}

impl ContentType {
    /// Parse a content-type token case-insensitively. Unrecognized tokens
    /// select the default textual representation.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("BINARYDATA") {
            Self::BinaryData
        } else if token.eq_ignore_ascii_case("BINARYDATAB64") {
            Self::BinaryDataB64
        } else {
            Self::String
        }
    }

    /// Kind of value to request from the backing directory.
    #[must_use]
    pub fn parameter_kind(self) -> ParameterKind {
        match self {
            Self::String => ParameterKind::Text,
            Self::BinaryData | Self::BinaryDataB64 => ParameterKind::Binary,
        }
    }
}

/// Storage kind of a partner directory parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// String parameter.
    Text,
    /// Binary parameter.
    Binary,
}

/// Parameter value as returned by the backing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// String parameter content.
    Text(String),
    /// Binary parameter content.
    Binary(Vec<u8>),
}
