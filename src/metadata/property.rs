// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Property descriptors and accessor strategies.
//!
//! A [`Property`] carries everything the reflective adapter needs to move one
//! member between an instance and the token stream: names, declared type,
//! accessor strategies, modifiers, and the exclusion flags computed once at
//! collection-build time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::{BindValue, Instance};
use crate::metadata::annotations::{AnnotationScope, AnnotationSet};
use crate::ty::TypeDescriptor;

/// Property modifier bits.
pub mod modifiers {
    pub const PUBLIC: u32 = 1 << 0;
    pub const PROTECTED: u32 = 1 << 1;
    pub const PRIVATE: u32 = 1 << 2;
    pub const STATIC: u32 = 1 << 3;
}

/// Custom getter: produce a property value from an instance.
pub type GetterFn = Arc<dyn Fn(&Instance) -> BindValue + Send + Sync>;

/// Custom setter: apply a decoded value to an instance.
pub type SetterFn = Arc<dyn Fn(&mut Instance, BindValue) + Send + Sync>;

/// How a property value is read from an instance.
#[derive(Clone)]
pub enum GetterStrategy {
    /// Direct field access by name.
    Field(String),
    /// A registered accessor, e.g. a virtual property's backing method.
    Provider(GetterFn),
}

impl GetterStrategy {
    pub fn get(&self, instance: &Instance) -> BindValue {
        match self {
            GetterStrategy::Field(name) => {
                instance.get(name).cloned().unwrap_or(BindValue::Null)
            }
            GetterStrategy::Provider(getter) => getter(instance),
        }
    }
}

impl fmt::Debug for GetterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GetterStrategy::Field(name) => write!(f, "GetterStrategy::Field({name})"),
            GetterStrategy::Provider(_) => write!(f, "GetterStrategy::Provider(..)"),
        }
    }
}

/// How a decoded value is applied to an instance.
#[derive(Clone)]
pub enum SetterStrategy {
    /// Direct field access by name.
    Field(String),
    /// A registered accessor.
    Receiver(SetterFn),
    /// No setter; the property cannot be deserialized.
    None,
}

impl SetterStrategy {
    pub fn set(&self, instance: &mut Instance, value: BindValue) {
        match self {
            SetterStrategy::Field(name) => instance.set(name.clone(), value),
            SetterStrategy::Receiver(setter) => setter(instance, value),
            SetterStrategy::None => {}
        }
    }
}

impl fmt::Debug for SetterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetterStrategy::Field(name) => write!(f, "SetterStrategy::Field({name})"),
            SetterStrategy::Receiver(_) => write!(f, "SetterStrategy::Receiver(..)"),
            SetterStrategy::None => write!(f, "SetterStrategy::None"),
        }
    }
}

/// Static information about one object property.
///
/// Built once per declaring class and cached; the skip flags are fixed during
/// collection construction and never recomputed per call.
#[derive(Debug, Clone)]
pub struct Property {
    real_name: String,
    serialized_name: String,
    ty: TypeDescriptor,
    getter: GetterStrategy,
    setter: SetterStrategy,
    annotations: AnnotationSet,
    modifiers: u32,
    virtual_property: bool,
    skip_serialize: bool,
    skip_deserialize: bool,
    skip_null_assignment: bool,
}

#[allow(clippy::too_many_arguments)]
impl Property {
    pub(crate) fn new(
        real_name: String,
        serialized_name: String,
        ty: TypeDescriptor,
        getter: GetterStrategy,
        setter: SetterStrategy,
        annotations: AnnotationSet,
        modifiers: u32,
        virtual_property: bool,
        skip_null_assignment: bool,
    ) -> Self {
        Property {
            real_name,
            serialized_name,
            ty,
            getter,
            setter,
            annotations,
            modifiers,
            virtual_property,
            skip_serialize: false,
            skip_deserialize: false,
            skip_null_assignment,
        }
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn serialized_name(&self) -> &str {
        &self.serialized_name
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn getter(&self) -> &GetterStrategy {
        &self.getter
    }

    pub fn setter(&self) -> &SetterStrategy {
        &self.setter
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn modifiers(&self) -> u32 {
        self.modifiers
    }

    /// True for method-backed pseudo-properties with no backing field.
    pub fn is_virtual(&self) -> bool {
        self.virtual_property
    }

    /// The annotation scope this property's checks filter on.
    pub fn annotation_scope(&self) -> AnnotationScope {
        if self.virtual_property {
            AnnotationScope::Method
        } else {
            AnnotationScope::Property
        }
    }

    pub fn skip_serialize(&self) -> bool {
        self.skip_serialize
    }

    pub fn skip_deserialize(&self) -> bool {
        self.skip_deserialize
    }

    /// True if a decoded null should leave the field untouched instead of
    /// being assigned.
    pub fn skip_null_assignment(&self) -> bool {
        self.skip_null_assignment
    }

    pub(crate) fn set_skip_serialize(&mut self, skip: bool) {
        self.skip_serialize = skip;
    }

    pub(crate) fn set_skip_deserialize(&mut self, skip: bool) {
        self.skip_deserialize = skip;
    }
}

/// The declared properties of one class, ordered by declaration, with
/// serialized-name lookup.
#[derive(Debug, Default)]
pub struct PropertyCollection {
    properties: Vec<Arc<Property>>,
    by_serialized_name: HashMap<String, usize>,
}

impl PropertyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, property: Property) {
        let index = self.properties.len();
        self.by_serialized_name
            .insert(property.serialized_name().to_string(), index);
        self.properties.push(Arc::new(property));
    }

    /// Look up a property by its serialized name, with its declaration
    /// index.
    pub fn get_by_serialized_name(&self, name: &str) -> Option<(usize, &Arc<Property>)> {
        self.by_serialized_name
            .get(name)
            .map(|&index| (index, &self.properties[index]))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Property>> {
        self.properties.iter()
    }

    /// Declared field names, skipping virtual properties.
    pub fn field_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| !p.is_virtual())
            .map(|p| p.real_name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(real: &str, serialized: &str) -> Property {
        Property::new(
            real.to_string(),
            serialized.to_string(),
            TypeDescriptor::wildcard(),
            GetterStrategy::Field(real.to_string()),
            SetterStrategy::Field(real.to_string()),
            AnnotationSet::new(),
            modifiers::PUBLIC,
            false,
            false,
        )
    }

    #[test]
    fn test_field_accessors() {
        let prop = property("name", "name");
        let mut instance = Instance::with_declared_fields("User", ["name"]);

        prop.setter().set(&mut instance, BindValue::from("test"));
        assert_eq!(prop.getter().get(&instance), BindValue::from("test"));
    }

    #[test]
    fn test_getter_of_missing_field_is_null() {
        let prop = property("other", "other");
        let instance = Instance::new("User");
        assert_eq!(prop.getter().get(&instance), BindValue::Null);
    }

    #[test]
    fn test_provider_getter() {
        let getter: GetterFn = Arc::new(|instance| {
            BindValue::String(format!("{}!", instance.class_name()))
        });
        let strategy = GetterStrategy::Provider(getter);
        assert_eq!(
            strategy.get(&Instance::new("User")),
            BindValue::from("User!")
        );
    }

    #[test]
    fn test_none_setter_is_inert() {
        let mut instance = Instance::new("User");
        SetterStrategy::None.set(&mut instance, BindValue::Integer(1));
        assert!(instance.is_empty());
    }

    #[test]
    fn test_collection_lookup() {
        let mut collection = PropertyCollection::new();
        collection.add(property("firstName", "first_name"));
        collection.add(property("age", "age"));

        let (index, prop) = collection.get_by_serialized_name("first_name").unwrap();
        assert_eq!(index, 0);
        assert_eq!(prop.real_name(), "firstName");
        assert!(collection.get_by_serialized_name("firstName").is_none());
    }

    #[test]
    fn test_field_names_skip_virtual() {
        let mut collection = PropertyCollection::new();
        collection.add(property("id", "id"));
        let virtual_prop = Property::new(
            "display".to_string(),
            "display".to_string(),
            TypeDescriptor::new("string"),
            GetterStrategy::Provider(Arc::new(|_| BindValue::Null)),
            SetterStrategy::None,
            AnnotationSet::new(),
            modifiers::PUBLIC,
            true,
            false,
        );
        collection.add(virtual_prop);

        assert_eq!(collection.field_names(), ["id"]);
    }
}
