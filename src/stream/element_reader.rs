// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tree-backed token reader.
//!
//! Walks a [`JsonElement`] tree through the shared reader state machine,
//! producing exactly the token stream the text-backed reader would produce
//! for the equivalent document.

use crate::element::{JsonArray, JsonElement, JsonObject, JsonPrimitive};
use crate::stream::reader::{JsonNumber, NodeReader, ReadNode};
use crate::stream::token::JsonToken;

impl ReadNode for JsonElement {
    type ObjectIter = indexmap::map::IntoIter<String, JsonElement>;
    type ArrayIter = std::vec::IntoIter<JsonElement>;

    fn classify(&self) -> JsonToken {
        match self {
            JsonElement::Object(_) => JsonToken::BeginObject,
            JsonElement::Array(_) => JsonToken::BeginArray,
            JsonElement::Null => JsonToken::Null,
            JsonElement::Primitive(JsonPrimitive::String(_)) => JsonToken::String,
            JsonElement::Primitive(JsonPrimitive::Boolean(_)) => JsonToken::Boolean,
            JsonElement::Primitive(_) => JsonToken::Number,
        }
    }

    fn into_object_iter(self) -> Self::ObjectIter {
        match self {
            JsonElement::Object(object) => object.into_iter(),
            _ => JsonObject::new().into_iter(),
        }
    }

    fn into_array_iter(self) -> Self::ArrayIter {
        match self {
            JsonElement::Array(array) => array.into_iter(),
            _ => JsonArray::new().into_iter(),
        }
    }

    fn read_string(&self) -> String {
        match self {
            JsonElement::Primitive(p) => p.as_string(),
            _ => String::new(),
        }
    }

    fn read_integer(&self) -> i64 {
        match self {
            JsonElement::Primitive(p) => p.as_integer(),
            _ => 0,
        }
    }

    fn read_float(&self) -> f64 {
        match self {
            JsonElement::Primitive(p) => p.as_float(),
            _ => 0.0,
        }
    }

    fn read_boolean(&self) -> bool {
        match self {
            JsonElement::Primitive(p) => p.as_boolean(),
            _ => false,
        }
    }

    fn read_number(&self) -> JsonNumber {
        match self {
            JsonElement::Primitive(JsonPrimitive::Integer(i)) => JsonNumber::Integer(*i),
            JsonElement::Primitive(JsonPrimitive::Float(f)) => JsonNumber::Float(*f),
            _ => JsonNumber::Integer(0),
        }
    }
}

/// Token reader over an in-memory element tree.
pub type JsonElementReader = NodeReader<JsonElement>;

impl NodeReader<JsonElement> {
    /// Position a reader before the root of an element tree.
    pub fn new(element: JsonElement) -> Self {
        NodeReader::with_root(element)
    }
}
