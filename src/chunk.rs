//! Data model for the retrieval unit.
//!
//! A [`Segment`] is what the external document parser hands us per ingest; a
//! [`Chunk`] is the immutable unit of retrieval after re-chunking. Metadata
//! values are coerced into the closed [`MetaValue`] set at creation time so
//! nothing duck-typed survives past the ingest boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed metadata value set. Anything outside it is stringified on ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Str(s) => write!(f, "{s}"),
            MetaValue::Int(v) => write!(f, "{v}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Raw text segment supplied by the excluded parsing collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Whether this segment marks a section boundary (title element).
    pub fn is_title(&self) -> bool {
        self.metadata
            .get("category")
            .or_else(|| self.metadata.get("element_type"))
            .and_then(|v| v.as_str())
            .is_some_and(|s| s.eq_ignore_ascii_case("title"))
    }
}

/// Immutable unit of retrieval. `id` is the chunk's position within its
/// generation and is stable for the generation's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: usize,
    pub text: String,
    pub metadata: BTreeMap<String, MetaValue>,
}

impl Chunk {
    pub fn source(&self) -> Option<&str> {
        match self.metadata.get("source") {
            Some(MetaValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Coerce a JSON metadata map into the closed [`MetaValue`] set.
///
/// Primitives map directly, nulls are dropped, and anything structured is
/// stringified through its JSON representation.
pub fn coerce_metadata(raw: &serde_json::Map<String, Value>) -> BTreeMap<String, MetaValue> {
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        let coerced = match value {
            Value::Null => continue,
            Value::Bool(b) => MetaValue::Bool(*b),
            Value::String(s) => MetaValue::Str(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    MetaValue::Int(i)
                } else {
                    MetaValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            other => MetaValue::Str(other.to_string()),
        };
        out.insert(key.clone(), coerced);
    }
    out
}
