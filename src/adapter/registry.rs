// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adapter registry: ordered factory resolution with per-type caching.
//!
//! The registry owns the factory chain and the adapter cache. The cache is
//! keyed by structural descriptor equality, so two requests for the same
//! type return the identical adapter instance. Resolution never holds the
//! cache lock while a factory runs, so factories may re-enter the registry
//! for nested types.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::adapter::custom::{CustomMappedAdapter, JsonDeserializer, JsonSerializer};
use crate::adapter::{TypeAdapter, TypeAdapterFactory};
use crate::core::{BindError, Result};
use crate::ty::TypeDescriptor;

/// An adapter registered under a name for annotation-driven resolution.
pub enum NamedRegistration {
    /// A complete adapter used as-is.
    Adapter(Arc<dyn TypeAdapter>),
    /// A factory asked to create per requested type.
    Factory(Arc<dyn TypeAdapterFactory>),
    /// A serializer and/or deserializer; the missing direction delegates to
    /// normal registry resolution.
    Custom {
        serializer: Option<Arc<dyn JsonSerializer>>,
        deserializer: Option<Arc<dyn JsonDeserializer>>,
    },
}

/// Resolves and caches type adapters.
pub struct AdapterRegistry {
    factories: Vec<Arc<dyn TypeAdapterFactory>>,
    named: HashMap<String, NamedRegistration>,
    cache: RwLock<HashMap<TypeDescriptor, Arc<dyn TypeAdapter>>>,
}

impl AdapterRegistry {
    /// Create a registry with the given factory chain and named
    /// registrations.
    pub fn new(
        factories: Vec<Arc<dyn TypeAdapterFactory>>,
        named: HashMap<String, NamedRegistration>,
    ) -> Arc<Self> {
        Arc::new(AdapterRegistry {
            factories,
            named,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Get the adapter for a type, creating and caching it on first request.
    ///
    /// # Errors
    ///
    /// Returns `BindError::NoAdapter` if no factory supports the type. This
    /// is a configuration error, never recoverable at runtime.
    pub fn get_adapter(self: &Arc<Self>, ty: &TypeDescriptor) -> Result<Arc<dyn TypeAdapter>> {
        if let Some(adapter) = self.cache.read().unwrap().get(ty) {
            return Ok(adapter.clone());
        }

        debug!(type_name = %ty, "adapter cache miss");
        let adapter = self.resolve(ty, None)?;

        let mut cache = self.cache.write().unwrap();
        Ok(cache.entry(ty.clone()).or_insert(adapter).clone())
    }

    /// Resolve an adapter while excluding one specific factory instance.
    ///
    /// Lets a custom adapter delegate to the adapter that would otherwise
    /// have been chosen, without re-selecting itself. The result bypasses
    /// the cache: caching it under the plain type key would shadow the
    /// unskipped resolution.
    pub fn get_adapter_skipping(
        self: &Arc<Self>,
        ty: &TypeDescriptor,
        skip: &dyn TypeAdapterFactory,
    ) -> Result<Arc<dyn TypeAdapter>> {
        self.resolve(ty, Some(skip))
    }

    /// Resolve an adapter declared by an `Adapter` annotation, bypassing
    /// factory iteration.
    pub fn get_adapter_from_annotation(
        self: &Arc<Self>,
        ty: &TypeDescriptor,
        name: &str,
    ) -> Result<Arc<dyn TypeAdapter>> {
        match self.named.get(name) {
            None => Err(BindError::declaration(format!(
                "no adapter named '{name}' is registered"
            ))),
            Some(NamedRegistration::Adapter(adapter)) => Ok(adapter.clone()),
            Some(NamedRegistration::Factory(factory)) => factory.create(ty, self),
            Some(NamedRegistration::Custom {
                serializer,
                deserializer,
            }) => Ok(Arc::new(CustomMappedAdapter::new(
                serializer.clone(),
                deserializer.clone(),
                ty.clone(),
                self.clone(),
                None,
            ))),
        }
    }

    fn resolve(
        self: &Arc<Self>,
        ty: &TypeDescriptor,
        skip: Option<&dyn TypeAdapterFactory>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        for factory in &self.factories {
            if let Some(skipped) = skip {
                if factory_eq(factory.as_ref(), skipped) {
                    continue;
                }
            }
            if factory.supports(ty) {
                return factory.create(ty, self);
            }
        }
        Err(BindError::no_adapter(ty.to_string()))
    }
}

/// Identity comparison of factory instances.
fn factory_eq(a: &dyn TypeAdapterFactory, b: &dyn TypeAdapterFactory) -> bool {
    std::ptr::eq(
        a as *const dyn TypeAdapterFactory as *const (),
        b as *const dyn TypeAdapterFactory as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BindValue;
    use crate::stream::{JsonReadable, JsonWritable};

    struct FixedAdapter(i64);

    impl TypeAdapter for FixedAdapter {
        fn read(&self, _reader: &mut dyn JsonReadable) -> Result<BindValue> {
            Ok(BindValue::Integer(self.0))
        }
        fn write(&self, writer: &mut dyn JsonWritable, _value: &BindValue) -> Result<()> {
            writer.write_integer(self.0)
        }
    }

    struct KindFactory {
        raw: &'static str,
        produces: i64,
    }

    impl TypeAdapterFactory for KindFactory {
        fn supports(&self, ty: &TypeDescriptor) -> bool {
            ty.raw_name() == self.raw
        }
        fn create(
            &self,
            _ty: &TypeDescriptor,
            _registry: &Arc<AdapterRegistry>,
        ) -> Result<Arc<dyn TypeAdapter>> {
            Ok(Arc::new(FixedAdapter(self.produces)))
        }
    }

    fn registry_with(factories: Vec<Arc<dyn TypeAdapterFactory>>) -> Arc<AdapterRegistry> {
        AdapterRegistry::new(factories, HashMap::new())
    }

    #[test]
    fn test_first_supporting_factory_wins() {
        let registry = registry_with(vec![
            Arc::new(KindFactory { raw: "A", produces: 1 }),
            Arc::new(KindFactory { raw: "A", produces: 2 }),
        ]);

        let adapter = registry.get_adapter(&TypeDescriptor::new("A")).unwrap();
        let mut reader = crate::stream::JsonDecodeReader::new("0").unwrap();
        assert_eq!(adapter.read(&mut reader).unwrap(), BindValue::Integer(1));
    }

    #[test]
    fn test_cache_returns_identical_instance() {
        let registry = registry_with(vec![Arc::new(KindFactory { raw: "A", produces: 1 })]);
        let ty = TypeDescriptor::new("A");

        let first = registry.get_adapter(&ty).unwrap();
        let second = registry.get_adapter(&ty).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_key_is_structural_including_generics() {
        let registry = registry_with(vec![Arc::new(KindFactory { raw: "array", produces: 1 })]);

        let plain = registry
            .get_adapter(&TypeDescriptor::parse("array").unwrap())
            .unwrap();
        let generic = registry
            .get_adapter(&TypeDescriptor::parse("array<int>").unwrap())
            .unwrap();
        let generic_again = registry
            .get_adapter(&TypeDescriptor::parse("array<int>").unwrap())
            .unwrap();

        assert!(!Arc::ptr_eq(&plain, &generic));
        assert!(Arc::ptr_eq(&generic, &generic_again));
    }

    #[test]
    fn test_no_adapter_found() {
        let registry = registry_with(vec![]);
        let err = registry.get_adapter(&TypeDescriptor::new("Missing")).err().unwrap();
        assert!(matches!(err, BindError::NoAdapter { .. }));
    }

    #[test]
    fn test_skipping_excludes_only_that_instance() {
        let first: Arc<dyn TypeAdapterFactory> = Arc::new(KindFactory { raw: "A", produces: 1 });
        let second: Arc<dyn TypeAdapterFactory> = Arc::new(KindFactory { raw: "A", produces: 2 });
        let registry = registry_with(vec![first.clone(), second]);

        let ty = TypeDescriptor::new("A");
        let adapter = registry.get_adapter_skipping(&ty, first.as_ref()).unwrap();
        let mut reader = crate::stream::JsonDecodeReader::new("0").unwrap();
        assert_eq!(adapter.read(&mut reader).unwrap(), BindValue::Integer(2));
    }

    #[test]
    fn test_skipping_does_not_populate_cache() {
        let first: Arc<dyn TypeAdapterFactory> = Arc::new(KindFactory { raw: "A", produces: 1 });
        let second: Arc<dyn TypeAdapterFactory> = Arc::new(KindFactory { raw: "A", produces: 2 });
        let registry = registry_with(vec![first.clone(), second]);

        let ty = TypeDescriptor::new("A");
        registry.get_adapter_skipping(&ty, first.as_ref()).unwrap();

        let adapter = registry.get_adapter(&ty).unwrap();
        let mut reader = crate::stream::JsonDecodeReader::new("0").unwrap();
        assert_eq!(adapter.read(&mut reader).unwrap(), BindValue::Integer(1));
    }

    #[test]
    fn test_named_adapter_resolution() {
        let mut named = HashMap::new();
        named.insert(
            "fixed".to_string(),
            NamedRegistration::Adapter(Arc::new(FixedAdapter(9))),
        );
        let registry = AdapterRegistry::new(vec![], named);

        let adapter = registry
            .get_adapter_from_annotation(&TypeDescriptor::new("A"), "fixed")
            .unwrap();
        let mut reader = crate::stream::JsonDecodeReader::new("0").unwrap();
        assert_eq!(adapter.read(&mut reader).unwrap(), BindValue::Integer(9));

        let err = registry
            .get_adapter_from_annotation(&TypeDescriptor::new("A"), "missing")
            .err()
            .unwrap();
        assert!(matches!(err, BindError::Declaration { .. }));
    }
}
