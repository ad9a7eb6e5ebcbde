// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adapter between the token stream and raw element trees.
//!
//! Reading collects whatever value comes next into a [`JsonElement`];
//! writing replays a tree through the writer. Custom serializer and
//! deserializer wrappers use the same helpers to cross between the stream
//! and tree worlds.

use std::sync::Arc;

use crate::adapter::registry::AdapterRegistry;
use crate::adapter::{TypeAdapter, TypeAdapterFactory};
use crate::core::{BindError, BindValue, Result};
use crate::element::{JsonArray, JsonElement, JsonObject, JsonPrimitive};
use crate::stream::{JsonNumber, JsonReadable, JsonToken, JsonWritable};
use crate::ty::{TypeDescriptor, TypeKind};

/// Read the next value, whatever its shape, into an element tree.
pub(crate) fn read_element(reader: &mut dyn JsonReadable) -> Result<JsonElement> {
    match reader.peek() {
        JsonToken::Null => {
            reader.next_null()?;
            Ok(JsonElement::Null)
        }
        JsonToken::Boolean => Ok(JsonElement::boolean(reader.next_boolean()?)),
        JsonToken::Number => Ok(match reader.next_number()? {
            JsonNumber::Integer(i) => JsonElement::integer(i),
            JsonNumber::Float(f) => JsonElement::float(f),
        }),
        JsonToken::String | JsonToken::Name => Ok(JsonElement::string(reader.next_string()?)),
        JsonToken::BeginArray => {
            reader.begin_array()?;
            let mut array = JsonArray::new();
            while reader.has_next() {
                array.push(read_element(reader)?);
            }
            reader.end_array()?;
            Ok(JsonElement::Array(array))
        }
        JsonToken::BeginObject => {
            reader.begin_object()?;
            let mut object = JsonObject::new();
            while reader.has_next() {
                let name = reader.next_name()?;
                object.insert(name, read_element(reader)?);
            }
            reader.end_object()?;
            Ok(JsonElement::Object(object))
        }
        token => Err(BindError::syntax("value", token, reader.path())),
    }
}

/// Replay an element tree through a writer.
pub(crate) fn write_element(writer: &mut dyn JsonWritable, element: &JsonElement) -> Result<()> {
    match element {
        JsonElement::Null => writer.write_null(),
        JsonElement::Primitive(JsonPrimitive::String(s)) => writer.write_string(s),
        JsonElement::Primitive(JsonPrimitive::Integer(i)) => writer.write_integer(*i),
        JsonElement::Primitive(JsonPrimitive::Float(f)) => writer.write_float(*f),
        JsonElement::Primitive(JsonPrimitive::Boolean(b)) => writer.write_boolean(*b),
        JsonElement::Array(array) => {
            writer.begin_array()?;
            for item in array.iter() {
                write_element(writer, item)?;
            }
            writer.end_array()
        }
        JsonElement::Object(object) => {
            writer.begin_object()?;
            for (name, value) in object.iter() {
                writer.name(name)?;
                write_element(writer, value)?;
            }
            writer.end_object()
        }
    }
}

/// Adapter for the element-tree type.
pub struct ElementTypeAdapter;

impl TypeAdapter for ElementTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        Ok(BindValue::Tree(read_element(reader)?))
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        match value {
            BindValue::Null => writer.write_null(),
            BindValue::Tree(element) => write_element(writer, element),
            other => Err(BindError::type_mismatch("element", other.type_name())),
        }
    }
}

/// Factory for the element-tree adapter.
pub struct ElementTypeAdapterFactory;

impl TypeAdapterFactory for ElementTypeAdapterFactory {
    fn supports(&self, ty: &TypeDescriptor) -> bool {
        ty.kind() == TypeKind::Element
    }

    fn create(
        &self,
        _ty: &TypeDescriptor,
        _registry: &Arc<AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        Ok(Arc::new(ElementTypeAdapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::JsonDecodeReader;

    #[test]
    fn test_read_any_shape_into_tree() {
        let json = r#"{"a": [1, 2.5, "x", null], "b": {"c": true}}"#;
        let mut reader = JsonDecodeReader::new(json).unwrap();
        let adapter = ElementTypeAdapter;

        let value = adapter.read(&mut reader).unwrap();
        let tree = value.as_tree().unwrap();
        let object = tree.as_object().unwrap();

        let a = object.get("a").unwrap().as_array().unwrap();
        assert_eq!(a.get(0), Some(&JsonElement::integer(1)));
        assert_eq!(a.get(1), Some(&JsonElement::float(2.5)));
        assert_eq!(a.get(3), Some(&JsonElement::Null));

        let b = object.get("b").unwrap().as_object().unwrap();
        assert_eq!(b.get("c"), Some(&JsonElement::boolean(true)));
    }

    #[test]
    fn test_write_tree_round_trip() {
        let json = r#"{"a":[1,2.5,"x",null],"b":{"c":true}}"#;
        let adapter: &dyn TypeAdapter = &ElementTypeAdapter;
        let value = adapter.read_from_json(json).unwrap();
        assert_eq!(adapter.write_to_json(&value, true).unwrap(), json);
    }

    #[test]
    fn test_null_reads_as_null_tree() {
        let adapter: &dyn TypeAdapter = &ElementTypeAdapter;
        let value = adapter.read_from_json("null").unwrap();
        assert_eq!(value, BindValue::Tree(JsonElement::Null));
    }

    #[test]
    fn test_write_rejects_non_tree() {
        let adapter: &dyn TypeAdapter = &ElementTypeAdapter;
        let err = adapter
            .write_to_json(&BindValue::Integer(1), true)
            .unwrap_err();
        assert!(matches!(err, BindError::TypeMismatch { .. }));
    }
}
