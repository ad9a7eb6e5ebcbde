// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Text-backed token reader.
//!
//! Parses a complete JSON document with serde_json (member order preserved)
//! and feeds the decoded value through the shared reader state machine.

use crate::core::{BindError, Result};
use crate::stream::reader::{JsonNumber, NodeReader, ReadNode};
use crate::stream::token::JsonToken;

impl ReadNode for serde_json::Value {
    type ObjectIter = serde_json::map::IntoIter;
    type ArrayIter = std::vec::IntoIter<serde_json::Value>;

    fn classify(&self) -> JsonToken {
        match self {
            serde_json::Value::Null => JsonToken::Null,
            serde_json::Value::Bool(_) => JsonToken::Boolean,
            serde_json::Value::Number(_) => JsonToken::Number,
            serde_json::Value::String(_) => JsonToken::String,
            serde_json::Value::Array(_) => JsonToken::BeginArray,
            serde_json::Value::Object(_) => JsonToken::BeginObject,
        }
    }

    fn into_object_iter(self) -> Self::ObjectIter {
        match self {
            serde_json::Value::Object(map) => map.into_iter(),
            _ => serde_json::Map::new().into_iter(),
        }
    }

    fn into_array_iter(self) -> Self::ArrayIter {
        match self {
            serde_json::Value::Array(items) => items.into_iter(),
            _ => Vec::new().into_iter(),
        }
    }

    fn read_string(&self) -> String {
        match self {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    fn read_integer(&self) -> i64 {
        match self {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i
                } else if n.as_u64().is_some() {
                    i64::MAX
                } else {
                    n.as_f64().unwrap_or(0.0) as i64
                }
            }
            serde_json::Value::Bool(b) => i64::from(*b),
            serde_json::Value::String(s) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn read_float(&self) -> f64 {
        match self {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::Bool(b) => f64::from(u8::from(*b)),
            serde_json::Value::String(s) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn read_boolean(&self) -> bool {
        match self {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
            serde_json::Value::String(s) => !s.is_empty(),
            _ => false,
        }
    }

    fn read_number(&self) -> JsonNumber {
        match self {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => JsonNumber::Integer(i),
                None => JsonNumber::Float(n.as_f64().unwrap_or(0.0)),
            },
            _ => JsonNumber::Integer(0),
        }
    }
}

/// Token reader over raw JSON text.
pub type JsonDecodeReader = NodeReader<serde_json::Value>;

impl NodeReader<serde_json::Value> {
    /// Decode a JSON document and position a reader before its root value.
    ///
    /// # Errors
    ///
    /// Returns `BindError::MalformedJson` if the text is not valid JSON.
    pub fn new(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| BindError::malformed_json(e.to_string()))?;
        Ok(NodeReader::with_root(value))
    }

    /// Position a reader before an already-decoded value.
    pub fn from_value(value: serde_json::Value) -> Self {
        NodeReader::with_root(value)
    }
}
