// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adapter for registered classes.
//!
//! Walks the class's cached property collection, applying exclusion and
//! naming policy and delegating every member value to the adapter resolved
//! for its declared type. Member adapters are resolved lazily on first use
//! so a class containing a field of its own type does not recurse during
//! adapter construction.
//!
//! A member that fails a grammar-level read is recorded against its declared
//! name and the remaining members keep decoding; the caller receives one
//! aggregate error carrying the partially-populated instance.

use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::adapter::registry::AdapterRegistry;
use crate::adapter::{TypeAdapter, TypeAdapterFactory};
use crate::core::{AggregateError, BindError, BindValue, Result};
use crate::instance::{ConstructorConstructor, ObjectConstructor};
use crate::metadata::{
    ClassMetadata, ClassRegistry, Excluder, Property, PropertyCollection,
    PropertyCollectionFactory,
};
use crate::stream::{JsonReadable, JsonToken, JsonWritable};
use crate::ty::{TypeDescriptor, TypeKind};

/// Adapter reading and writing instances of one registered class.
pub struct ReflectionTypeAdapter {
    constructor: ObjectConstructor,
    properties: Arc<PropertyCollection>,
    class_metadata: Arc<ClassMetadata>,
    excluder: Arc<Excluder>,
    registry: Arc<AdapterRegistry>,
    /// Annotation-driven class exclusion, fixed at construction.
    class_skip_serialize: bool,
    class_skip_deserialize: bool,
    /// Lazily resolved member adapters, one cell per property.
    member_adapters: Vec<OnceLock<Arc<dyn TypeAdapter>>>,
}

impl ReflectionTypeAdapter {
    fn member_adapter(&self, index: usize, property: &Property) -> Result<Arc<dyn TypeAdapter>> {
        if let Some(adapter) = self.member_adapters[index].get() {
            return Ok(adapter.clone());
        }
        let adapter = match property.annotations().adapter(property.annotation_scope()) {
            Some(name) => self
                .registry
                .get_adapter_from_annotation(property.ty(), name)?,
            None => self.registry.get_adapter(property.ty())?,
        };
        Ok(self.member_adapters[index]
            .get_or_init(|| adapter)
            .clone())
    }
}

impl TypeAdapter for ReflectionTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        if reader.peek() == JsonToken::Null {
            reader.next_null()?;
            return Ok(BindValue::Null);
        }
        if self.class_skip_deserialize
            || self
                .excluder
                .exclude_class_by_strategy(&self.class_metadata, false)
        {
            reader.skip_value();
            return Ok(BindValue::Null);
        }

        let mut instance = self.constructor.construct();
        let mut failures = AggregateError::new();

        reader.begin_object()?;
        while reader.has_next() {
            let name = reader.next_name()?;
            let (index, property) = match self.properties.get_by_serialized_name(&name) {
                Some(found) => found,
                None => {
                    reader.skip_value();
                    continue;
                }
            };
            if property.skip_deserialize()
                || self.excluder.exclude_property_by_strategy(property, false)
            {
                reader.skip_value();
                continue;
            }

            let adapter = self.member_adapter(index, property)?;
            match adapter.read(reader) {
                Ok(value) => {
                    if !(value.is_null() && property.skip_null_assignment()) {
                        property.setter().set(&mut instance, value);
                    }
                }
                Err(error) if error.is_recoverable() => {
                    warn!(
                        class = self.class_metadata.name(),
                        property = property.real_name(),
                        error = %error,
                        "member failed to bind, continuing with siblings"
                    );
                    // A nested aggregate failure already consumed past the
                    // bad value; only flat failures leave it pending.
                    let nested_aggregate = error.is_aggregate();
                    failures.insert(property.real_name(), error);
                    if !nested_aggregate {
                        reader.skip_value();
                    }
                }
                Err(error) => return Err(error),
            }
        }
        reader.end_object()?;

        if failures.is_empty() {
            Ok(BindValue::Object(instance))
        } else {
            Err(BindError::Aggregate(
                failures.with_partial(BindValue::Object(instance)),
            ))
        }
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        let instance = match value {
            BindValue::Null => return writer.write_null(),
            BindValue::Object(instance) => instance,
            other => {
                return Err(BindError::type_mismatch(
                    self.class_metadata.name(),
                    other.type_name(),
                ))
            }
        };

        // An excluded class is suppressed as a whole, but its slot is
        // preserved as null for position-dependent consumers.
        if self.class_skip_serialize
            || self
                .excluder
                .exclude_class_by_strategy(&self.class_metadata, true)
        {
            return writer.write_null();
        }

        writer.begin_object()?;
        for (index, property) in self.properties.iter().enumerate() {
            writer.name(property.serialized_name())?;
            if property.skip_serialize()
                || self.excluder.exclude_property_by_strategy(property, true)
            {
                writer.write_null()?;
                continue;
            }
            let adapter = self.member_adapter(index, property)?;
            adapter.write(writer, &property.getter().get(instance))?;
        }
        writer.end_object()
    }
}

/// Factory creating [`ReflectionTypeAdapter`]s for registered classes.
pub struct ReflectionTypeAdapterFactory {
    class_registry: Arc<ClassRegistry>,
    collection_factory: Arc<PropertyCollectionFactory>,
    constructors: Arc<ConstructorConstructor>,
    excluder: Arc<Excluder>,
}

impl ReflectionTypeAdapterFactory {
    pub fn new(
        class_registry: Arc<ClassRegistry>,
        collection_factory: Arc<PropertyCollectionFactory>,
        constructors: Arc<ConstructorConstructor>,
        excluder: Arc<Excluder>,
    ) -> Self {
        ReflectionTypeAdapterFactory {
            class_registry,
            collection_factory,
            constructors,
            excluder,
        }
    }
}

impl TypeAdapterFactory for ReflectionTypeAdapterFactory {
    fn supports(&self, ty: &TypeDescriptor) -> bool {
        ty.kind() == TypeKind::Object && self.class_registry.contains(ty.raw_name())
    }

    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &Arc<AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        let properties = self.collection_factory.create(ty.raw_name())?;
        let class_metadata = self.class_registry.class_metadata(ty.raw_name()).ok_or_else(|| {
            BindError::declaration(format!("class '{}' is not registered", ty.raw_name()))
        })?;
        let constructor = self.constructors.get(ty, properties.field_names());

        let class_skip_serialize = self.excluder.exclude_class(&class_metadata, true);
        let class_skip_deserialize = self.excluder.exclude_class(&class_metadata, false);
        let member_adapters = (0..properties.len()).map(|_| OnceLock::new()).collect();

        Ok(Arc::new(ReflectionTypeAdapter {
            constructor,
            properties,
            class_metadata,
            excluder: self.excluder.clone(),
            registry: registry.clone(),
            class_skip_serialize,
            class_skip_deserialize,
            member_adapters,
        }))
    }
}
