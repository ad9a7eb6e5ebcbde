// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Class metadata, registration specs, and the property-collection cache.
//!
//! With no runtime reflection, class shape comes from an injected metadata
//! source: a registry the builder populates from [`ClassSpec`]s. The registry
//! is read-only once built. Property collections are assembled lazily per
//! class (naming policy applied, types parsed, exclusion flags computed once)
//! and cached for the registry's lifetime.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::core::{BindError, Result};
use crate::metadata::annotations::{Annotation, AnnotationScope, AnnotationSet};
use crate::metadata::excluder::Excluder;
use crate::metadata::naming::PropertyNamingPolicy;
use crate::metadata::property::{
    modifiers, GetterFn, GetterStrategy, Property, PropertyCollection, SetterFn, SetterStrategy,
};
use crate::ty::TypeDescriptor;

/// Name and class-level annotations of a registered class.
#[derive(Debug, Clone)]
pub struct ClassMetadata {
    name: String,
    annotations: AnnotationSet,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>, annotations: AnnotationSet) -> Self {
        ClassMetadata {
            name: name.into(),
            annotations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }
}

// =============================================================================
// Registration Specs
// =============================================================================

/// Declarative description of one property, registered through the builder.
pub struct PropertySpec {
    name: String,
    type_hint: Option<String>,
    annotations: AnnotationSet,
    modifiers: u32,
    getter: Option<GetterFn>,
    setter: Option<SetterFn>,
    virtual_property: bool,
    skip_null_assignment: bool,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>) -> Self {
        PropertySpec {
            name: name.into(),
            type_hint: None,
            annotations: AnnotationSet::new(),
            modifiers: modifiers::PUBLIC,
            getter: None,
            setter: None,
            virtual_property: false,
            skip_null_assignment: false,
        }
    }

    /// Declare the property type in the type grammar.
    pub fn with_type(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    /// Attach a property-scoped annotation.
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.add(AnnotationScope::Property, annotation);
        self
    }

    /// Attach a method-scoped annotation (queried for virtual properties).
    pub fn annotate_method(mut self, annotation: Annotation) -> Self {
        self.annotations.add(AnnotationScope::Method, annotation);
        self
    }

    pub fn with_modifiers(mut self, modifiers: u32) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Register a custom getter.
    pub fn getter_with(mut self, getter: GetterFn) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Register a custom setter.
    pub fn setter_with(mut self, setter: SetterFn) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Mark this as a virtual (method-backed, serialize-only) property with
    /// the given accessor.
    pub fn virtual_with(mut self, getter: GetterFn) -> Self {
        self.virtual_property = true;
        self.getter = Some(getter);
        self.annotations
            .add(AnnotationScope::Method, Annotation::VirtualProperty);
        self
    }

    /// Leave the field untouched when the decoded value is null.
    pub fn skip_null_assignment(mut self, skip: bool) -> Self {
        self.skip_null_assignment = skip;
        self
    }
}

/// Declarative description of one class, registered through the builder.
pub struct ClassSpec {
    name: String,
    annotations: AnnotationSet,
    properties: Vec<PropertySpec>,
}

impl ClassSpec {
    pub fn new(name: impl Into<String>) -> Self {
        ClassSpec {
            name: name.into(),
            annotations: AnnotationSet::new(),
            properties: Vec::new(),
        }
    }

    /// Attach a class-scoped annotation.
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.add(AnnotationScope::Class, annotation);
        self
    }

    /// Declare a property.
    pub fn property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Class Registry
// =============================================================================

struct ClassEntry {
    metadata: Arc<ClassMetadata>,
    properties: Vec<PropertySpec>,
}

/// The injected metadata source: registered class shapes, read-only once
/// built.
pub struct ClassRegistry {
    classes: HashMap<String, ClassEntry>,
}

impl ClassRegistry {
    /// Build a registry from class specs.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if a class name is registered twice.
    pub fn new(specs: Vec<ClassSpec>) -> Result<Self> {
        let mut classes = HashMap::new();
        for spec in specs {
            let ClassSpec {
                name,
                annotations,
                properties,
            } = spec;
            // Type hints are validated here so a bad declaration aborts
            // setup instead of surfacing inside a read.
            for property in &properties {
                let scope = if property.virtual_property {
                    AnnotationScope::Method
                } else {
                    AnnotationScope::Property
                };
                if let Some(hint) = property
                    .annotations
                    .type_hint(scope)
                    .or(property.type_hint.as_deref())
                {
                    TypeDescriptor::parse(hint)?;
                }
            }
            let entry = ClassEntry {
                metadata: Arc::new(ClassMetadata::new(name.clone(), annotations)),
                properties,
            };
            if classes.insert(name.clone(), entry).is_some() {
                return Err(BindError::declaration(format!(
                    "class '{name}' is registered more than once"
                )));
            }
        }
        debug!(classes = classes.len(), "class registry populated");
        Ok(ClassRegistry { classes })
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    pub fn class_metadata(&self, class_name: &str) -> Option<Arc<ClassMetadata>> {
        self.classes
            .get(class_name)
            .map(|entry| entry.metadata.clone())
    }

    fn entry(&self, class_name: &str) -> Option<&ClassEntry> {
        self.classes.get(class_name)
    }
}

// =============================================================================
// Property Collection Factory
// =============================================================================

/// Builds and caches one [`PropertyCollection`] per class.
///
/// The expensive work (type parsing, naming policy, annotation-driven
/// exclusion) happens once per class; the skip flags on each property are
/// fixed here and never recomputed per call.
pub struct PropertyCollectionFactory {
    registry: Arc<ClassRegistry>,
    naming: PropertyNamingPolicy,
    excluder: Arc<Excluder>,
    cache: RwLock<HashMap<String, Arc<PropertyCollection>>>,
}

impl PropertyCollectionFactory {
    pub fn new(
        registry: Arc<ClassRegistry>,
        naming: PropertyNamingPolicy,
        excluder: Arc<Excluder>,
    ) -> Self {
        PropertyCollectionFactory {
            registry,
            naming,
            excluder,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the property collection for a registered class.
    pub fn create(&self, class_name: &str) -> Result<Arc<PropertyCollection>> {
        if let Some(collection) = self.cache.read().unwrap().get(class_name) {
            return Ok(collection.clone());
        }

        let entry = self.registry.entry(class_name).ok_or_else(|| {
            BindError::declaration(format!("class '{class_name}' is not registered"))
        })?;

        let mut collection = PropertyCollection::new();
        for spec in &entry.properties {
            collection.add(self.build_property(spec)?);
        }
        debug!(
            class = class_name,
            properties = collection.len(),
            "property collection built"
        );

        let collection = Arc::new(collection);
        let mut cache = self.cache.write().unwrap();
        Ok(cache
            .entry(class_name.to_string())
            .or_insert(collection)
            .clone())
    }

    fn build_property(&self, spec: &PropertySpec) -> Result<Property> {
        let scope = if spec.virtual_property {
            AnnotationScope::Method
        } else {
            AnnotationScope::Property
        };

        let ty = match spec.annotations.type_hint(scope).or(spec.type_hint.as_deref()) {
            Some(hint) => TypeDescriptor::parse(hint)?,
            None => TypeDescriptor::wildcard(),
        };

        let serialized_name = match spec.annotations.serialized_name(scope) {
            Some(name) => name.to_string(),
            None => self.naming.translate(&spec.name),
        };

        let getter = match &spec.getter {
            Some(getter) => GetterStrategy::Provider(getter.clone()),
            None => GetterStrategy::Field(spec.name.clone()),
        };
        let setter = if spec.virtual_property {
            SetterStrategy::None
        } else {
            match &spec.setter {
                Some(setter) => SetterStrategy::Receiver(setter.clone()),
                None => SetterStrategy::Field(spec.name.clone()),
            }
        };

        let mut property = Property::new(
            spec.name.clone(),
            serialized_name,
            ty,
            getter,
            setter,
            spec.annotations.clone(),
            spec.modifiers,
            spec.virtual_property,
            spec.skip_null_assignment,
        );

        // Annotation-driven exclusion is decided exactly once, here.
        property.set_skip_serialize(self.excluder.exclude_property(&property, true));
        property
            .set_skip_deserialize(spec.virtual_property || self.excluder.exclude_property(&property, false));
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BindValue;
    use crate::ty::TypeKind;

    fn factory_for(specs: Vec<ClassSpec>) -> PropertyCollectionFactory {
        PropertyCollectionFactory::new(
            Arc::new(ClassRegistry::new(specs).unwrap()),
            PropertyNamingPolicy::Identity,
            Arc::new(Excluder::new()),
        )
    }

    #[test]
    fn test_duplicate_class_is_rejected() {
        let result = ClassRegistry::new(vec![ClassSpec::new("User"), ClassSpec::new("User")]);
        assert!(matches!(result, Err(BindError::Declaration { .. })));
    }

    #[test]
    fn test_collection_is_cached() {
        let factory = factory_for(vec![
            ClassSpec::new("User").property(PropertySpec::new("id").with_type("int"))
        ]);

        let first = factory.create("User").unwrap();
        let second = factory.create("User").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unregistered_class_fails() {
        let factory = factory_for(vec![]);
        assert!(matches!(
            factory.create("Missing"),
            Err(BindError::Declaration { .. })
        ));
    }

    #[test]
    fn test_type_hints_and_wildcard_default() {
        let factory = factory_for(vec![ClassSpec::new("User")
            .property(PropertySpec::new("id").with_type("int"))
            .property(PropertySpec::new("anything"))]);

        let collection = factory.create("User").unwrap();
        let (_, id) = collection.get_by_serialized_name("id").unwrap();
        assert_eq!(id.ty().kind(), TypeKind::Integer);
        let (_, anything) = collection.get_by_serialized_name("anything").unwrap();
        assert_eq!(anything.ty().kind(), TypeKind::Wildcard);
    }

    #[test]
    fn test_malformed_type_hint_fails() {
        let factory = factory_for(vec![
            ClassSpec::new("User").property(PropertySpec::new("bad").with_type("array<"))
        ]);
        assert!(matches!(
            factory.create("User"),
            Err(BindError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_serialized_name_annotation_beats_naming_policy() {
        let factory = PropertyCollectionFactory::new(
            Arc::new(
                ClassRegistry::new(vec![ClassSpec::new("User")
                    .property(PropertySpec::new("firstName"))
                    .property(
                        PropertySpec::new("lastName")
                            .annotate(Annotation::SerializedName("surname".to_string())),
                    )])
                .unwrap(),
            ),
            PropertyNamingPolicy::LowerCaseWithUnderscores,
            Arc::new(Excluder::new()),
        );

        let collection = factory.create("User").unwrap();
        assert!(collection.get_by_serialized_name("first_name").is_some());
        assert!(collection.get_by_serialized_name("surname").is_some());
        assert!(collection.get_by_serialized_name("lastName").is_none());
    }

    #[test]
    fn test_skip_flags_computed_at_build() {
        let factory = factory_for(vec![ClassSpec::new("User")
            .property(PropertySpec::new("password").annotate(Annotation::Exclude {
                serialize: true,
                deserialize: false,
            }))
            .property(PropertySpec::new("name"))]);

        let collection = factory.create("User").unwrap();
        let (_, password) = collection.get_by_serialized_name("password").unwrap();
        assert!(password.skip_serialize());
        assert!(!password.skip_deserialize());
        let (_, name) = collection.get_by_serialized_name("name").unwrap();
        assert!(!name.skip_serialize());
    }

    #[test]
    fn test_virtual_property_never_deserializes() {
        let getter: GetterFn = Arc::new(|instance| {
            BindValue::String(format!("{}", instance.class_name()))
        });
        let factory = factory_for(vec![ClassSpec::new("User")
            .property(PropertySpec::new("display").virtual_with(getter))]);

        let collection = factory.create("User").unwrap();
        let (_, display) = collection.get_by_serialized_name("display").unwrap();
        assert!(display.is_virtual());
        assert!(display.skip_deserialize());
        assert!(!display.skip_serialize());
    }

    #[test]
    fn test_class_metadata_lookup() {
        let registry = ClassRegistry::new(vec![
            ClassSpec::new("User").annotate(Annotation::Since("2.0".to_string()))
        ])
        .unwrap();

        assert!(registry.contains("User"));
        assert!(!registry.contains("Other"));
        let metadata = registry.class_metadata("User").unwrap();
        assert_eq!(metadata.name(), "User");
        assert_eq!(metadata.annotations().since(AnnotationScope::Class), Some("2.0"));
    }
}
