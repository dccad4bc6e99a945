//! Runtime value representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hypergraph::BinaryPropertyId;

/// Typed property value stored on vertices and hyperedges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Inline binary data.
    Binary(Vec<u8>),
    /// Vector embedding.
    Vector(Vec<f32>),
    /// Timestamp (nanoseconds since Unix epoch).
    Timestamp(i64),
    /// Date (days since Unix epoch).
    Date(i32),
    /// Array of values.
    Array(Vec<Value>),
    /// Map of string keys to values.
    Map(BTreeMap<String, Value>),
    /// Reference to a large binary payload held by the binary subsystem.
    BinaryRef(BinaryPropertyId),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the referenced binary property id.
    pub fn as_binary_ref(&self) -> Option<BinaryPropertyId> {
        match self {
            Self::BinaryRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int64(_) => "Int64",
            Self::Float64(_) => "Float64",
            Self::String(_) => "String",
            Self::Binary(_) => "Binary",
            Self::Vector(_) => "Vector",
            Self::Timestamp(_) => "Timestamp",
            Self::Date(_) => "Date",
            Self::Array(_) => "Array",
            Self::Map(_) => "Map",
            Self::BinaryRef(_) => "BinaryRef",
        }
    }

    /// Approximate number of bytes this value occupies in storage.
    ///
    /// One tag byte plus the payload. Referenced binary payloads count only
    /// the reference; their bytes are accounted by the binary subsystem.
    pub fn storage_size(&self) -> u64 {
        let payload = match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Date(_) => 4,
            Self::Int64(_) | Self::Float64(_) | Self::Timestamp(_) | Self::BinaryRef(_) => 8,
            Self::String(s) => s.len() as u64,
            Self::Binary(b) => b.len() as u64,
            Self::Vector(v) => 4 * v.len() as u64,
            Self::Array(items) => items.iter().map(Self::storage_size).sum(),
            Self::Map(entries) => entries
                .iter()
                .map(|(k, v)| k.len() as u64 + v.storage_size())
                .sum(),
        };
        1 + payload
    }

    /// Collect every binary property id referenced by this value, including
    /// nested arrays and maps.
    pub fn collect_binary_refs(&self, out: &mut Vec<BinaryPropertyId>) {
        match self {
            Self::BinaryRef(id) => out.push(*id),
            Self::Array(items) => items.iter().for_each(|v| v.collect_binary_refs(out)),
            Self::Map(entries) => entries.values().for_each(|v| v.collect_binary_refs(out)),
            _ => {}
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int64(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Self::Vector(v)
    }
}
