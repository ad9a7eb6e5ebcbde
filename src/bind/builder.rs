// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder assembling a configured [`JsonBind`](crate::bind::JsonBind)
//! engine.
//!
//! All configuration is collected here and validated in [`build`]
//! (JsonBindBuilder::build); configuration errors abort setup before any
//! data flows. User adapter registrations are consulted before built-in
//! factories, and a later registration takes priority over an earlier one
//! for the same type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::{
    AdapterRegistry, AggregateTypeAdapterFactory, CustomAdapterFactory, ElementTypeAdapterFactory,
    FixedTypeAdapterFactory, JsonDeserializer, JsonSerializer, NamedRegistration,
    ReflectionTypeAdapterFactory, ScalarTypeAdapterFactory, TypeAdapter, TypeAdapterFactory,
};
use crate::bind::JsonBind;
use crate::core::{BindError, Result};
use crate::instance::{ConstructorConstructor, InstanceCreator};
use crate::metadata::{
    ClassRegistry, ClassSpec, Excluder, ExclusionStrategy, PropertyCollectionFactory,
    PropertyNamingPolicy,
};
use crate::ty::TypeDescriptor;

/// One user adapter registration, kept in registration order.
enum UserRegistration {
    Factory(Arc<dyn TypeAdapterFactory>),
    Adapter(String, Arc<dyn TypeAdapter>),
    Custom {
        type_of: String,
        serializer: Option<Arc<dyn JsonSerializer>>,
        deserializer: Option<Arc<dyn JsonDeserializer>>,
    },
}

/// Configuration for a [`JsonBind`] engine.
pub struct JsonBindBuilder {
    version: Option<String>,
    excluded_modifiers: Option<u32>,
    require_expose: bool,
    serialize_null: bool,
    naming: PropertyNamingPolicy,
    classes: Vec<ClassSpec>,
    strategies: Vec<(Arc<dyn ExclusionStrategy>, bool, bool)>,
    registrations: Vec<UserRegistration>,
    named: HashMap<String, NamedRegistration>,
    duplicate_named: Option<String>,
    instance_creators: HashMap<String, Arc<dyn InstanceCreator>>,
}

impl Default for JsonBindBuilder {
    fn default() -> Self {
        JsonBindBuilder {
            version: None,
            excluded_modifiers: None,
            require_expose: false,
            serialize_null: false,
            naming: PropertyNamingPolicy::Identity,
            classes: Vec::new(),
            strategies: Vec::new(),
            registrations: Vec::new(),
            named: HashMap::new(),
            duplicate_named: None,
            instance_creators: HashMap::new(),
        }
    }
}

impl JsonBindBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version tested against `Since`/`Until` annotations.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the modifier bits that exclude properties outright.
    pub fn excluded_modifiers(mut self, modifiers: u32) -> Self {
        self.excluded_modifiers = Some(modifiers);
        self
    }

    /// Require an `Expose` annotation for members to participate.
    pub fn require_expose(mut self, require: bool) -> Self {
        self.require_expose = require;
        self
    }

    /// Emit `name: null` members instead of dropping them.
    pub fn serialize_nulls(mut self, serialize: bool) -> Self {
        self.serialize_null = serialize;
        self
    }

    /// Set the naming policy applied when no `SerializedName` annotation
    /// exists.
    pub fn naming_policy(mut self, naming: PropertyNamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Register a class shape.
    pub fn register_class(mut self, class: ClassSpec) -> Self {
        self.classes.push(class);
        self
    }

    /// Add an exclusion strategy for one or both directions.
    pub fn add_exclusion_strategy(
        mut self,
        strategy: Arc<dyn ExclusionStrategy>,
        serialization: bool,
        deserialization: bool,
    ) -> Self {
        self.strategies.push((strategy, serialization, deserialization));
        self
    }

    /// Register an adapter for one type. A later registration for the same
    /// type takes priority.
    pub fn register_adapter(
        mut self,
        type_of: impl Into<String>,
        adapter: Arc<dyn TypeAdapter>,
    ) -> Self {
        self.registrations
            .push(UserRegistration::Adapter(type_of.into(), adapter));
        self
    }

    /// Register an adapter factory consulted before the built-in ones.
    pub fn register_adapter_factory(mut self, factory: Arc<dyn TypeAdapterFactory>) -> Self {
        self.registrations.push(UserRegistration::Factory(factory));
        self
    }

    /// Register a serializer for one type; reads delegate to the adapter
    /// that would otherwise have been chosen.
    pub fn register_serializer(
        mut self,
        type_of: impl Into<String>,
        serializer: Arc<dyn JsonSerializer>,
    ) -> Self {
        self.registrations.push(UserRegistration::Custom {
            type_of: type_of.into(),
            serializer: Some(serializer),
            deserializer: None,
        });
        self
    }

    /// Register a deserializer for one type; writes delegate to the adapter
    /// that would otherwise have been chosen.
    pub fn register_deserializer(
        mut self,
        type_of: impl Into<String>,
        deserializer: Arc<dyn JsonDeserializer>,
    ) -> Self {
        self.registrations.push(UserRegistration::Custom {
            type_of: type_of.into(),
            serializer: None,
            deserializer: Some(deserializer),
        });
        self
    }

    /// Register an adapter under a name referenced by `Adapter` annotations.
    pub fn register_named(mut self, name: impl Into<String>, registration: NamedRegistration) -> Self {
        let name = name.into();
        if self.named.insert(name.clone(), registration).is_some() {
            self.duplicate_named.get_or_insert(name);
        }
        self
    }

    /// Register a custom instance creator for a class.
    pub fn register_instance_creator(
        mut self,
        class_name: impl Into<String>,
        creator: Arc<dyn InstanceCreator>,
    ) -> Self {
        self.instance_creators.insert(class_name.into(), creator);
        self
    }

    /// Assemble the engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for duplicate class registrations,
    /// ambiguous named-adapter registrations, or malformed type strings.
    pub fn build(self) -> Result<JsonBind> {
        if let Some(name) = self.duplicate_named {
            return Err(BindError::declaration(format!(
                "adapter name '{name}' is registered more than once"
            )));
        }

        let mut excluder = Excluder::new();
        if let Some(version) = self.version {
            excluder.set_version(version);
        }
        if let Some(modifiers) = self.excluded_modifiers {
            excluder.set_excluded_modifiers(modifiers);
        }
        excluder.set_require_expose(self.require_expose);
        for (strategy, serialization, deserialization) in self.strategies {
            excluder.add_strategy(strategy, serialization, deserialization);
        }
        let excluder = Arc::new(excluder);

        let class_registry = Arc::new(ClassRegistry::new(self.classes)?);
        let collection_factory = Arc::new(PropertyCollectionFactory::new(
            class_registry.clone(),
            self.naming,
            excluder.clone(),
        ));
        let constructors = Arc::new(ConstructorConstructor::new(self.instance_creators));

        // User registrations come first, newest first; built-ins follow,
        // reflection last.
        let mut factories: Vec<Arc<dyn TypeAdapterFactory>> = Vec::new();
        for registration in self.registrations.into_iter().rev() {
            factories.push(match registration {
                UserRegistration::Factory(factory) => factory,
                UserRegistration::Adapter(type_of, adapter) => Arc::new(
                    FixedTypeAdapterFactory::new(TypeDescriptor::parse(&type_of)?, adapter),
                ),
                UserRegistration::Custom {
                    type_of,
                    serializer,
                    deserializer,
                } => CustomAdapterFactory::new(
                    TypeDescriptor::parse(&type_of)?,
                    serializer,
                    deserializer,
                ),
            });
        }
        let user_factories = factories.len();
        factories.push(Arc::new(ScalarTypeAdapterFactory));
        factories.push(Arc::new(ElementTypeAdapterFactory));
        factories.push(Arc::new(AggregateTypeAdapterFactory));
        factories.push(Arc::new(ReflectionTypeAdapterFactory::new(
            class_registry,
            collection_factory,
            constructors,
            excluder,
        )));

        debug!(
            user_factories,
            total_factories = factories.len(),
            "engine assembled"
        );
        let registry = AdapterRegistry::new(factories, self.named);
        Ok(JsonBind::with_registry(registry, self.serialize_null))
    }
}
