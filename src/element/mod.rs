// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON element tree.
//!
//! Provides an in-memory JSON representation as a discriminated union of
//! object, array, primitive, and null nodes. Trees are built programmatically
//! or produced from decoded text, and can be walked by the tree-backed token
//! reader without mutation.
//!
//! Object member order is insertion order and is preserved through every
//! conversion.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A single node in a JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonElement {
    /// A JSON object with insertion-ordered members.
    Object(JsonObject),
    /// A JSON array.
    Array(JsonArray),
    /// A string, number, or boolean.
    Primitive(JsonPrimitive),
    /// The JSON null literal.
    Null,
}

impl JsonElement {
    /// Create a string primitive.
    pub fn string(value: impl Into<String>) -> Self {
        JsonElement::Primitive(JsonPrimitive::String(value.into()))
    }

    /// Create an integer primitive.
    pub fn integer(value: i64) -> Self {
        JsonElement::Primitive(JsonPrimitive::Integer(value))
    }

    /// Create a float primitive.
    pub fn float(value: f64) -> Self {
        JsonElement::Primitive(JsonPrimitive::Float(value))
    }

    /// Create a boolean primitive.
    pub fn boolean(value: bool) -> Self {
        JsonElement::Primitive(JsonPrimitive::Boolean(value))
    }

    /// Create a primitive from an optional value.
    ///
    /// A `None` yields [`JsonElement::Null`]; a primitive node never wraps
    /// an absent value.
    pub fn primitive_of<T: Into<JsonPrimitive>>(value: Option<T>) -> Self {
        match value {
            Some(v) => JsonElement::Primitive(v.into()),
            None => JsonElement::Null,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonElement::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonElement::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, JsonElement::Primitive(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonElement::Null)
    }

    /// Borrow the object node, if this is an object.
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonElement::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrow the array node, if this is an array.
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            JsonElement::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow the primitive node, if this is a primitive.
    pub fn as_primitive(&self) -> Option<&JsonPrimitive> {
        match self {
            JsonElement::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Render this tree as compact JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Convert into the serde_json value model.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            JsonElement::Null => serde_json::Value::Null,
            JsonElement::Primitive(JsonPrimitive::Boolean(b)) => serde_json::Value::Bool(*b),
            JsonElement::Primitive(JsonPrimitive::Integer(i)) => {
                serde_json::Value::Number(serde_json::Number::from(*i))
            }
            JsonElement::Primitive(JsonPrimitive::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonElement::Primitive(JsonPrimitive::String(s)) => {
                serde_json::Value::String(s.clone())
            }
            JsonElement::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|e| e.to_json_value()).collect())
            }
            JsonElement::Object(obj) => {
                let mut map = serde_json::Map::new();
                for (key, value) in obj.iter() {
                    map.insert(key.clone(), value.to_json_value());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl From<serde_json::Value> for JsonElement {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonElement::Null,
            serde_json::Value::Bool(b) => JsonElement::boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    JsonElement::integer(i)
                } else {
                    JsonElement::float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => JsonElement::Primitive(JsonPrimitive::String(s)),
            serde_json::Value::Array(items) => {
                let mut array = JsonArray::new();
                for item in items {
                    array.push(JsonElement::from(item));
                }
                JsonElement::Array(array)
            }
            serde_json::Value::Object(entries) => {
                let mut object = JsonObject::new();
                for (key, value) in entries {
                    object.insert(key, JsonElement::from(value));
                }
                JsonElement::Object(object)
            }
        }
    }
}

impl Serialize for JsonElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonElement::Null => serializer.serialize_unit(),
            JsonElement::Primitive(JsonPrimitive::Boolean(b)) => serializer.serialize_bool(*b),
            JsonElement::Primitive(JsonPrimitive::Integer(i)) => serializer.serialize_i64(*i),
            JsonElement::Primitive(JsonPrimitive::Float(f)) => serializer.serialize_f64(*f),
            JsonElement::Primitive(JsonPrimitive::String(s)) => serializer.serialize_str(s),
            JsonElement::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonElement::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (key, value) in obj.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for JsonElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json_string())
    }
}

/// A JSON primitive: exactly one of string, integer, float, or boolean.
///
/// Integer and float values are distinguished at construction and are not
/// coerced into each other until a caller asks for a specific representation.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPrimitive {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl JsonPrimitive {
    pub fn is_string(&self) -> bool {
        matches!(self, JsonPrimitive::String(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, JsonPrimitive::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, JsonPrimitive::Float(_))
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, JsonPrimitive::Boolean(_))
    }

    /// Coerce the stored value to a string.
    pub fn as_string(&self) -> String {
        match self {
            JsonPrimitive::String(s) => s.clone(),
            JsonPrimitive::Integer(i) => i.to_string(),
            JsonPrimitive::Float(f) => f.to_string(),
            JsonPrimitive::Boolean(b) => b.to_string(),
        }
    }

    /// Coerce the stored value to an integer.
    pub fn as_integer(&self) -> i64 {
        match self {
            JsonPrimitive::Integer(i) => *i,
            JsonPrimitive::Float(f) => *f as i64,
            JsonPrimitive::Boolean(b) => i64::from(*b),
            JsonPrimitive::String(s) => s.parse().unwrap_or(0),
        }
    }

    /// Coerce the stored value to a float. Integers widen without loss over
    /// the exactly-representable range.
    pub fn as_float(&self) -> f64 {
        match self {
            JsonPrimitive::Float(f) => *f,
            JsonPrimitive::Integer(i) => *i as f64,
            JsonPrimitive::Boolean(b) => f64::from(u8::from(*b)),
            JsonPrimitive::String(s) => s.parse().unwrap_or(0.0),
        }
    }

    /// Coerce the stored value to a boolean.
    pub fn as_boolean(&self) -> bool {
        match self {
            JsonPrimitive::Boolean(b) => *b,
            JsonPrimitive::Integer(i) => *i != 0,
            JsonPrimitive::Float(f) => *f != 0.0,
            JsonPrimitive::String(s) => !s.is_empty(),
        }
    }
}

impl From<String> for JsonPrimitive {
    fn from(value: String) -> Self {
        JsonPrimitive::String(value)
    }
}

impl From<&str> for JsonPrimitive {
    fn from(value: &str) -> Self {
        JsonPrimitive::String(value.to_string())
    }
}

impl From<i64> for JsonPrimitive {
    fn from(value: i64) -> Self {
        JsonPrimitive::Integer(value)
    }
}

impl From<f64> for JsonPrimitive {
    fn from(value: f64) -> Self {
        JsonPrimitive::Float(value)
    }
}

impl From<bool> for JsonPrimitive {
    fn from(value: bool) -> Self {
        JsonPrimitive::Boolean(value)
    }
}

/// A JSON object whose members iterate in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonObject {
    members: IndexMap<String, JsonElement>,
}

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member, replacing any existing member with the same name.
    pub fn insert(&mut self, name: impl Into<String>, element: JsonElement) {
        self.members.insert(name.into(), element);
    }

    /// Insert a string member; `None` inserts null.
    pub fn insert_string(&mut self, name: impl Into<String>, value: Option<&str>) {
        self.insert(name, JsonElement::primitive_of(value));
    }

    /// Insert an integer member; `None` inserts null.
    pub fn insert_integer(&mut self, name: impl Into<String>, value: Option<i64>) {
        self.insert(name, JsonElement::primitive_of(value));
    }

    /// Insert a float member; `None` inserts null.
    pub fn insert_float(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.insert(name, JsonElement::primitive_of(value));
    }

    /// Insert a boolean member; `None` inserts null.
    pub fn insert_boolean(&mut self, name: impl Into<String>, value: Option<bool>) {
        self.insert(name, JsonElement::primitive_of(value));
    }

    pub fn get(&self, name: &str) -> Option<&JsonElement> {
        self.members.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Remove a member, preserving the order of the remaining members.
    pub fn remove(&mut self, name: &str) -> Option<JsonElement> {
        self.members.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonElement)> {
        self.members.iter()
    }
}

impl IntoIterator for JsonObject {
    type Item = (String, JsonElement);
    type IntoIter = indexmap::map::IntoIter<String, JsonElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl FromIterator<(String, JsonElement)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (String, JsonElement)>>(iter: I) -> Self {
        JsonObject {
            members: iter.into_iter().collect(),
        }
    }
}

/// A JSON array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonArray {
    items: Vec<JsonElement>,
}

impl JsonArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: JsonElement) {
        self.items.push(element);
    }

    pub fn get(&self, index: usize) -> Option<&JsonElement> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonElement> {
        self.items.iter()
    }
}

impl IntoIterator for JsonArray {
    type Item = JsonElement;
    type IntoIter = std::vec::IntoIter<JsonElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<JsonElement> for JsonArray {
    fn from_iter<I: IntoIterator<Item = JsonElement>>(iter: I) -> Self {
        JsonArray {
            items: iter.into_iter().collect(),
        }
    }
}
