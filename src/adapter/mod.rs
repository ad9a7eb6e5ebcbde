// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Type adapters: the polymorphic read/write strategies, the factory chain,
//! and the caching registry that resolves them.
//!
//! An adapter converts between a [`BindValue`] and the token stream. The
//! [`AdapterRegistry`](registry::AdapterRegistry) consults an ordered list of
//! factories, asks the first supporting one to create an adapter, and caches
//! the result per resolved type so repeated requests return the identical
//! instance.

pub mod aggregate;
pub mod custom;
pub mod element;
pub mod reflection;
pub mod registry;
pub mod scalar;

use std::sync::Arc;

use crate::core::{BindValue, Result};
use crate::element::JsonElement;
use crate::stream::{
    JsonDecodeReader, JsonElementReader, JsonElementWriter, JsonReadable, JsonTextWriter,
    JsonWritable,
};
use crate::ty::TypeDescriptor;

pub use aggregate::{AggregateTypeAdapter, AggregateTypeAdapterFactory};
pub use custom::{
    CustomAdapterFactory, CustomMappedAdapter, DeserializationContext, FixedTypeAdapterFactory,
    JsonDeserializer, JsonSerializer, SerializationContext,
};
pub use element::{ElementTypeAdapter, ElementTypeAdapterFactory};
pub use reflection::{ReflectionTypeAdapter, ReflectionTypeAdapterFactory};
pub use registry::{AdapterRegistry, NamedRegistration};
pub use scalar::ScalarTypeAdapterFactory;

/// Strategy converting between a value and the token stream.
pub trait TypeAdapter: Send + Sync {
    /// Read the next value from the stream.
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue>;

    /// Write a value to the stream.
    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()>;
}

impl dyn TypeAdapter {
    /// Read a value from JSON text.
    pub fn read_from_json(&self, json: &str) -> Result<BindValue> {
        let mut reader = JsonDecodeReader::new(json)?;
        self.read(&mut reader)
    }

    /// Read a value from an element tree.
    pub fn read_from_element(&self, element: &JsonElement) -> Result<BindValue> {
        let mut reader = JsonElementReader::new(element.clone());
        self.read(&mut reader)
    }

    /// Write a value to JSON text under the given null policy.
    pub fn write_to_json(&self, value: &BindValue, serialize_null: bool) -> Result<String> {
        let mut writer = JsonTextWriter::new();
        writer.set_serialize_null(serialize_null);
        self.write(&mut writer, value)?;
        writer.into_string()
    }

    /// Write a value to an element tree under the given null policy.
    pub fn write_to_element(&self, value: &BindValue, serialize_null: bool) -> Result<JsonElement> {
        let mut writer = JsonElementWriter::new();
        writer.set_serialize_null(serialize_null);
        self.write(&mut writer, value)?;
        writer.into_element()
    }
}

/// Creates adapters for the types it declares support for.
///
/// Factories are consulted in registration order; user-registered factories
/// are consulted before built-in ones.
pub trait TypeAdapterFactory: Send + Sync {
    /// Whether this factory can create an adapter for the type.
    fn supports(&self, ty: &TypeDescriptor) -> bool;

    /// Create an adapter for a supported type.
    ///
    /// May re-enter the registry to resolve nested types, but must not
    /// eagerly resolve an adapter for `ty` itself.
    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &Arc<registry::AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>>;
}
