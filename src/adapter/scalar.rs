// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in adapters for scalar kinds, the null type, and the wildcard.

use std::sync::Arc;

use crate::adapter::registry::AdapterRegistry;
use crate::adapter::{TypeAdapter, TypeAdapterFactory};
use crate::core::{BindError, BindValue, Result};
use crate::stream::{JsonNumber, JsonReadable, JsonToken, JsonWritable};
use crate::ty::{TypeDescriptor, TypeKind};

/// Adapter for booleans.
pub struct BooleanTypeAdapter;

impl TypeAdapter for BooleanTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        if reader.peek() == JsonToken::Null {
            reader.next_null()?;
            return Ok(BindValue::Null);
        }
        Ok(BindValue::Bool(reader.next_boolean()?))
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        match value {
            BindValue::Null => writer.write_null(),
            BindValue::Bool(b) => writer.write_boolean(*b),
            BindValue::Integer(i) => writer.write_boolean(*i != 0),
            BindValue::Float(f) => writer.write_boolean(*f != 0.0),
            other => Err(BindError::type_mismatch("boolean", other.type_name())),
        }
    }
}

/// Adapter for integers.
pub struct IntegerTypeAdapter;

impl TypeAdapter for IntegerTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        if reader.peek() == JsonToken::Null {
            reader.next_null()?;
            return Ok(BindValue::Null);
        }
        Ok(BindValue::Integer(reader.next_integer()?))
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        match value {
            BindValue::Null => writer.write_null(),
            BindValue::Integer(i) => writer.write_integer(*i),
            BindValue::Float(f) => writer.write_integer(*f as i64),
            BindValue::Bool(b) => writer.write_integer(i64::from(*b)),
            other => Err(BindError::type_mismatch("integer", other.type_name())),
        }
    }
}

/// Adapter for floats.
pub struct FloatTypeAdapter;

impl TypeAdapter for FloatTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        if reader.peek() == JsonToken::Null {
            reader.next_null()?;
            return Ok(BindValue::Null);
        }
        Ok(BindValue::Float(reader.next_double()?))
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        match value {
            BindValue::Null => writer.write_null(),
            BindValue::Float(f) => writer.write_float(*f),
            BindValue::Integer(i) => writer.write_float(*i as f64),
            other => Err(BindError::type_mismatch("float", other.type_name())),
        }
    }
}

/// Adapter for strings.
pub struct StringTypeAdapter;

impl TypeAdapter for StringTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        if reader.peek() == JsonToken::Null {
            reader.next_null()?;
            return Ok(BindValue::Null);
        }
        Ok(BindValue::String(reader.next_string()?))
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        match value {
            BindValue::Null => writer.write_null(),
            BindValue::String(s) => writer.write_string(s),
            BindValue::Integer(i) => writer.write_string(&i.to_string()),
            BindValue::Float(f) => writer.write_string(&f.to_string()),
            BindValue::Bool(b) => writer.write_string(&b.to_string()),
            other => Err(BindError::type_mismatch("string", other.type_name())),
        }
    }
}

/// Adapter for the null type.
pub struct NullTypeAdapter;

impl TypeAdapter for NullTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        reader.next_null()?;
        Ok(BindValue::Null)
    }

    fn write(&self, writer: &mut dyn JsonWritable, _value: &BindValue) -> Result<()> {
        writer.write_null()
    }
}

/// Adapter for the wildcard type: dispatches on the runtime shape of the
/// stream (reading) or the value (writing) instead of a static declaration.
pub struct WildcardTypeAdapter {
    registry: Arc<AdapterRegistry>,
}

impl WildcardTypeAdapter {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        WildcardTypeAdapter { registry }
    }
}

impl TypeAdapter for WildcardTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        match reader.peek() {
            JsonToken::BeginObject | JsonToken::BeginArray => self
                .registry
                .get_adapter(&TypeDescriptor::aggregate())?
                .read(reader),
            JsonToken::String | JsonToken::Name => Ok(BindValue::String(reader.next_string()?)),
            JsonToken::Number => Ok(match reader.next_number()? {
                JsonNumber::Integer(i) => BindValue::Integer(i),
                JsonNumber::Float(f) => BindValue::Float(f),
            }),
            JsonToken::Boolean => Ok(BindValue::Bool(reader.next_boolean()?)),
            JsonToken::Null => {
                reader.next_null()?;
                Ok(BindValue::Null)
            }
            token => Err(BindError::syntax("value", token, reader.path())),
        }
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        if value.is_null() {
            return writer.write_null();
        }
        let ty = TypeDescriptor::from_value(value);
        self.registry.get_adapter(&ty)?.write(writer, value)
    }
}

/// Factory for all scalar kinds, the null type, and the wildcard.
pub struct ScalarTypeAdapterFactory;

impl TypeAdapterFactory for ScalarTypeAdapterFactory {
    fn supports(&self, ty: &TypeDescriptor) -> bool {
        matches!(
            ty.kind(),
            TypeKind::Boolean
                | TypeKind::Integer
                | TypeKind::Float
                | TypeKind::String
                | TypeKind::Null
                | TypeKind::Wildcard
        )
    }

    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &Arc<AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        Ok(match ty.kind() {
            TypeKind::Boolean => Arc::new(BooleanTypeAdapter),
            TypeKind::Integer => Arc::new(IntegerTypeAdapter),
            TypeKind::Float => Arc::new(FloatTypeAdapter),
            TypeKind::String => Arc::new(StringTypeAdapter),
            TypeKind::Null => Arc::new(NullTypeAdapter),
            _ => Arc::new(WildcardTypeAdapter::new(registry.clone())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::JsonDecodeReader;

    fn read_with(adapter: &dyn TypeAdapter, json: &str) -> Result<BindValue> {
        let mut reader = JsonDecodeReader::new(json).unwrap();
        adapter.read(&mut reader)
    }

    #[test]
    fn test_scalar_reads() {
        assert_eq!(
            read_with(&BooleanTypeAdapter, "true").unwrap(),
            BindValue::Bool(true)
        );
        assert_eq!(
            read_with(&IntegerTypeAdapter, "42").unwrap(),
            BindValue::Integer(42)
        );
        assert_eq!(
            read_with(&FloatTypeAdapter, "2.5").unwrap(),
            BindValue::Float(2.5)
        );
        assert_eq!(
            read_with(&StringTypeAdapter, "\"hi\"").unwrap(),
            BindValue::String("hi".to_string())
        );
    }

    #[test]
    fn test_scalars_tolerate_null() {
        assert_eq!(read_with(&BooleanTypeAdapter, "null").unwrap(), BindValue::Null);
        assert_eq!(read_with(&IntegerTypeAdapter, "null").unwrap(), BindValue::Null);
        assert_eq!(read_with(&StringTypeAdapter, "null").unwrap(), BindValue::Null);
    }

    #[test]
    fn test_scalar_read_mismatch_is_syntax_error() {
        let err = read_with(&IntegerTypeAdapter, "\"x\"").unwrap_err();
        assert!(matches!(err, BindError::Syntax { .. }));
    }

    #[test]
    fn test_scalar_writes() {
        let adapter: &dyn TypeAdapter = &IntegerTypeAdapter;
        assert_eq!(
            adapter.write_to_json(&BindValue::Integer(7), true).unwrap(),
            "7"
        );

        let adapter: &dyn TypeAdapter = &StringTypeAdapter;
        assert_eq!(
            adapter
                .write_to_json(&BindValue::String("a".to_string()), true)
                .unwrap(),
            "\"a\""
        );
    }

    #[test]
    fn test_write_kind_mismatch() {
        let adapter: &dyn TypeAdapter = &BooleanTypeAdapter;
        let err = adapter
            .write_to_json(&BindValue::String("x".to_string()), true)
            .unwrap_err();
        assert!(matches!(err, BindError::TypeMismatch { .. }));
    }

    #[test]
    fn test_integer_widens_when_written_as_float() {
        let adapter: &dyn TypeAdapter = &FloatTypeAdapter;
        assert_eq!(
            adapter.write_to_json(&BindValue::Integer(3), true).unwrap(),
            "3.0"
        );
    }

    #[test]
    fn test_factory_supports_scalar_kinds_only() {
        let factory = ScalarTypeAdapterFactory;
        assert!(factory.supports(&TypeDescriptor::new("int")));
        assert!(factory.supports(&TypeDescriptor::new("?")));
        assert!(factory.supports(&TypeDescriptor::new("null")));
        assert!(!factory.supports(&TypeDescriptor::new("array")));
        assert!(!factory.supports(&TypeDescriptor::new("User")));
    }
}
