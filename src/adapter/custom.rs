// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! User extension points: serializers and deserializers working on element
//! trees, the wrapper adapter that splices them into the stream protocol,
//! and the factories for user-registered adapters.
//!
//! A serializer-only or deserializer-only registration delegates the missing
//! direction to the adapter the registry would otherwise have chosen,
//! skipping the registration's own factory. The delegate is resolved lazily
//! on first use so custom adapters for self-referential types never recurse
//! during construction.

use std::sync::{Arc, OnceLock, Weak};

use crate::adapter::element::{read_element, write_element};
use crate::adapter::registry::AdapterRegistry;
use crate::adapter::{TypeAdapter, TypeAdapterFactory};
use crate::core::{BindValue, Result};
use crate::element::JsonElement;
use crate::stream::{JsonElementReader, JsonReadable, JsonWritable};
use crate::ty::TypeDescriptor;

/// Context handed to serializers for re-entering the engine.
pub struct SerializationContext {
    registry: Arc<AdapterRegistry>,
}

impl SerializationContext {
    pub(crate) fn new(registry: Arc<AdapterRegistry>) -> Self {
        SerializationContext { registry }
    }

    /// Serialize a nested value into an element tree using the adapter
    /// resolved for its runtime type.
    pub fn serialize(&self, value: &BindValue) -> Result<JsonElement> {
        let ty = TypeDescriptor::from_value(value);
        let adapter = self.registry.get_adapter(&ty)?;
        adapter.write_to_element(value, true)
    }
}

/// Context handed to deserializers for re-entering the engine.
pub struct DeserializationContext {
    registry: Arc<AdapterRegistry>,
}

impl DeserializationContext {
    pub(crate) fn new(registry: Arc<AdapterRegistry>) -> Self {
        DeserializationContext { registry }
    }

    /// Deserialize an element tree as the given type.
    pub fn deserialize(&self, element: &JsonElement, ty: &TypeDescriptor) -> Result<BindValue> {
        let adapter = self.registry.get_adapter(ty)?;
        let mut reader = JsonElementReader::new(element.clone());
        adapter.read(&mut reader)
    }
}

/// User hook converting a value into an element tree.
pub trait JsonSerializer: Send + Sync {
    fn serialize(
        &self,
        value: &BindValue,
        ty: &TypeDescriptor,
        context: &SerializationContext,
    ) -> Result<JsonElement>;
}

/// User hook converting an element tree into a value.
pub trait JsonDeserializer: Send + Sync {
    fn deserialize(
        &self,
        element: &JsonElement,
        ty: &TypeDescriptor,
        context: &DeserializationContext,
    ) -> Result<BindValue>;
}

/// Adapter backed by a serializer and/or deserializer, with registry
/// delegation for the missing direction.
pub struct CustomMappedAdapter {
    serializer: Option<Arc<dyn JsonSerializer>>,
    deserializer: Option<Arc<dyn JsonDeserializer>>,
    ty: TypeDescriptor,
    registry: Arc<AdapterRegistry>,
    skip_factory: Option<Arc<dyn TypeAdapterFactory>>,
    delegate: OnceLock<Arc<dyn TypeAdapter>>,
}

impl CustomMappedAdapter {
    pub(crate) fn new(
        serializer: Option<Arc<dyn JsonSerializer>>,
        deserializer: Option<Arc<dyn JsonDeserializer>>,
        ty: TypeDescriptor,
        registry: Arc<AdapterRegistry>,
        skip_factory: Option<Arc<dyn TypeAdapterFactory>>,
    ) -> Self {
        CustomMappedAdapter {
            serializer,
            deserializer,
            ty,
            registry,
            skip_factory,
            delegate: OnceLock::new(),
        }
    }

    /// The adapter the registry would otherwise have chosen, resolved on
    /// first use.
    fn delegate(&self) -> Result<Arc<dyn TypeAdapter>> {
        if let Some(adapter) = self.delegate.get() {
            return Ok(adapter.clone());
        }
        let adapter = match &self.skip_factory {
            Some(factory) => self
                .registry
                .get_adapter_skipping(&self.ty, factory.as_ref())?,
            None => self.registry.get_adapter(&self.ty)?,
        };
        Ok(self.delegate.get_or_init(|| adapter).clone())
    }
}

impl TypeAdapter for CustomMappedAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        match &self.deserializer {
            Some(deserializer) => {
                let element = read_element(reader)?;
                deserializer.deserialize(
                    &element,
                    &self.ty,
                    &DeserializationContext::new(self.registry.clone()),
                )
            }
            None => self.delegate()?.read(reader),
        }
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        match &self.serializer {
            Some(serializer) => {
                if value.is_null() {
                    return writer.write_null();
                }
                let element = serializer.serialize(
                    value,
                    &self.ty,
                    &SerializationContext::new(self.registry.clone()),
                )?;
                write_element(writer, &element)
            }
            None => self.delegate()?.write(writer, value),
        }
    }
}

/// Factory for a user-registered serializer/deserializer pair bound to one
/// type.
pub struct CustomAdapterFactory {
    ty: TypeDescriptor,
    serializer: Option<Arc<dyn JsonSerializer>>,
    deserializer: Option<Arc<dyn JsonDeserializer>>,
    self_ref: Weak<CustomAdapterFactory>,
}

impl CustomAdapterFactory {
    pub fn new(
        ty: TypeDescriptor,
        serializer: Option<Arc<dyn JsonSerializer>>,
        deserializer: Option<Arc<dyn JsonDeserializer>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| CustomAdapterFactory {
            ty,
            serializer,
            deserializer,
            self_ref: self_ref.clone(),
        })
    }
}

impl TypeAdapterFactory for CustomAdapterFactory {
    fn supports(&self, ty: &TypeDescriptor) -> bool {
        *ty == self.ty
    }

    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &Arc<AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        let skip_factory = self
            .self_ref
            .upgrade()
            .map(|factory| factory as Arc<dyn TypeAdapterFactory>);
        Ok(Arc::new(CustomMappedAdapter::new(
            self.serializer.clone(),
            self.deserializer.clone(),
            ty.clone(),
            registry.clone(),
            skip_factory,
        )))
    }
}

/// Factory handing out one fixed adapter for one type.
pub struct FixedTypeAdapterFactory {
    ty: TypeDescriptor,
    adapter: Arc<dyn TypeAdapter>,
}

impl FixedTypeAdapterFactory {
    pub fn new(ty: TypeDescriptor, adapter: Arc<dyn TypeAdapter>) -> Self {
        FixedTypeAdapterFactory { ty, adapter }
    }
}

impl TypeAdapterFactory for FixedTypeAdapterFactory {
    fn supports(&self, ty: &TypeDescriptor) -> bool {
        *ty == self.ty
    }

    fn create(
        &self,
        _ty: &TypeDescriptor,
        _registry: &Arc<AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        Ok(self.adapter.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::scalar::ScalarTypeAdapterFactory;
    use std::collections::HashMap;

    /// Serializer wrapping the value in `{"wrapped": ...}`.
    struct Wrapping;

    impl JsonSerializer for Wrapping {
        fn serialize(
            &self,
            value: &BindValue,
            _ty: &TypeDescriptor,
            context: &SerializationContext,
        ) -> Result<JsonElement> {
            let mut object = crate::element::JsonObject::new();
            object.insert("wrapped", context.serialize(value)?);
            Ok(JsonElement::Object(object))
        }
    }

    /// Deserializer unwrapping `{"wrapped": ...}`.
    struct Unwrapping;

    impl JsonDeserializer for Unwrapping {
        fn deserialize(
            &self,
            element: &JsonElement,
            _ty: &TypeDescriptor,
            context: &DeserializationContext,
        ) -> Result<BindValue> {
            let inner = element
                .as_object()
                .and_then(|o| o.get("wrapped"))
                .cloned()
                .unwrap_or(JsonElement::Null);
            context.deserialize(&inner, &TypeDescriptor::new("int"))
        }
    }

    fn registry_with_custom(
        serializer: Option<Arc<dyn JsonSerializer>>,
        deserializer: Option<Arc<dyn JsonDeserializer>>,
    ) -> Arc<AdapterRegistry> {
        let custom = CustomAdapterFactory::new(TypeDescriptor::new("int"), serializer, deserializer);
        AdapterRegistry::new(
            vec![custom, Arc::new(ScalarTypeAdapterFactory)],
            HashMap::new(),
        )
    }

    #[test]
    fn test_serializer_with_delegated_read() {
        let registry = registry_with_custom(Some(Arc::new(Wrapping)), None);
        let adapter = registry.get_adapter(&TypeDescriptor::new("int")).unwrap();

        // Write goes through the serializer.
        assert_eq!(
            adapter.write_to_json(&BindValue::Integer(7), true).unwrap(),
            r#"{"wrapped":7}"#
        );
        // Read falls back to the next applicable factory.
        assert_eq!(
            adapter.read_from_json("7").unwrap(),
            BindValue::Integer(7)
        );
    }

    #[test]
    fn test_deserializer_with_delegated_write() {
        let registry = registry_with_custom(None, Some(Arc::new(Unwrapping)));
        let adapter = registry.get_adapter(&TypeDescriptor::new("int")).unwrap();

        assert_eq!(
            adapter.read_from_json(r#"{"wrapped": 9}"#).unwrap(),
            BindValue::Integer(9)
        );
        assert_eq!(
            adapter.write_to_json(&BindValue::Integer(9), true).unwrap(),
            "9"
        );
    }

    #[test]
    fn test_round_trip_through_both_hooks() {
        let registry =
            registry_with_custom(Some(Arc::new(Wrapping)), Some(Arc::new(Unwrapping)));
        let adapter = registry.get_adapter(&TypeDescriptor::new("int")).unwrap();

        let json = adapter.write_to_json(&BindValue::Integer(3), true).unwrap();
        assert_eq!(adapter.read_from_json(&json).unwrap(), BindValue::Integer(3));
    }

    #[test]
    fn test_serializer_passes_null_through() {
        let registry = registry_with_custom(Some(Arc::new(Wrapping)), None);
        let adapter = registry.get_adapter(&TypeDescriptor::new("int")).unwrap();
        assert_eq!(adapter.write_to_json(&BindValue::Null, true).unwrap(), "null");
    }
}
