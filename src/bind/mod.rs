// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The engine façade.
//!
//! [`JsonBind`] resolves one adapter through the registry and invokes its
//! read or write; it carries no independent conversion logic. Engines are
//! built once through [`JsonBindBuilder`] and hold every cache, so tests can
//! construct fresh engines with empty caches.

pub mod builder;

pub use builder::JsonBindBuilder;

use std::sync::Arc;

use crate::adapter::AdapterRegistry;
use crate::core::{BindValue, Result};
use crate::element::JsonElement;
use crate::stream::{JsonDecodeReader, JsonElementReader};
use crate::ty::TypeDescriptor;

/// A configured serialization engine.
pub struct JsonBind {
    registry: Arc<AdapterRegistry>,
    serialize_null: bool,
}

impl JsonBind {
    /// Start configuring an engine.
    pub fn builder() -> JsonBindBuilder {
        JsonBindBuilder::new()
    }

    pub(crate) fn with_registry(registry: Arc<AdapterRegistry>, serialize_null: bool) -> Self {
        JsonBind {
            registry,
            serialize_null,
        }
    }

    /// Serialize a value to JSON text, resolving the adapter from the
    /// value's runtime type.
    pub fn to_json(&self, value: &BindValue) -> Result<String> {
        let ty = TypeDescriptor::from_value(value);
        let adapter = self.registry.get_adapter(&ty)?;
        adapter.write_to_json(value, self.serialize_null)
    }

    /// Deserialize JSON text as the type given in the type grammar.
    pub fn from_json(&self, json: &str, type_of: &str) -> Result<BindValue> {
        self.from_json_as(json, &TypeDescriptor::parse(type_of)?)
    }

    /// Deserialize JSON text as a resolved type descriptor.
    pub fn from_json_as(&self, json: &str, ty: &TypeDescriptor) -> Result<BindValue> {
        let adapter = self.registry.get_adapter(ty)?;
        let mut reader = JsonDecodeReader::new(json)?;
        adapter.read(&mut reader)
    }

    /// Serialize a value to an element tree.
    pub fn to_element(&self, value: &BindValue) -> Result<JsonElement> {
        let ty = TypeDescriptor::from_value(value);
        let adapter = self.registry.get_adapter(&ty)?;
        adapter.write_to_element(value, self.serialize_null)
    }

    /// Deserialize an element tree as the type given in the type grammar.
    pub fn from_element(&self, element: &JsonElement, type_of: &str) -> Result<BindValue> {
        let ty = TypeDescriptor::parse(type_of)?;
        let adapter = self.registry.get_adapter(&ty)?;
        let mut reader = JsonElementReader::new(element.clone());
        adapter.read(&mut reader)
    }

    /// The adapter registry backing this engine.
    pub fn registry(&self) -> &Arc<AdapterRegistry> {
        &self.registry
    }

    /// Whether nulls are serialized.
    pub fn serializes_nulls(&self) -> bool {
        self.serialize_null
    }
}
