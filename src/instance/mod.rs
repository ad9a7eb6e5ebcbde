// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Instance construction strategies.
//!
//! Deserialization needs a blank target before any member is read. A custom
//! [`InstanceCreator`] registered for the class wins; otherwise a blank
//! instance is constructed with the declared fields seeded to null. The
//! selection is done once per adapter and the resulting
//! [`ObjectConstructor`] is reused for every read.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::Instance;
use crate::ty::TypeDescriptor;

/// User hook for custom instantiation of a class.
pub trait InstanceCreator: Send + Sync {
    /// Produce a blank instance for the requested type.
    fn create_instance(&self, ty: &TypeDescriptor) -> Instance;
}

/// A ready-to-use construction strategy for one class.
pub enum ObjectConstructor {
    /// Delegate to a registered creator.
    FromCreator {
        creator: Arc<dyn InstanceCreator>,
        ty: TypeDescriptor,
    },
    /// Construct a blank instance with declared fields seeded to null.
    Blank {
        class_name: String,
        fields: Vec<String>,
    },
}

impl ObjectConstructor {
    pub fn construct(&self) -> Instance {
        match self {
            ObjectConstructor::FromCreator { creator, ty } => creator.create_instance(ty),
            ObjectConstructor::Blank { class_name, fields } => {
                Instance::with_declared_fields(class_name, fields.iter().map(String::as_str))
            }
        }
    }
}

/// Selects the [`ObjectConstructor`] for a type: registered creator first,
/// else blank construction.
#[derive(Default)]
pub struct ConstructorConstructor {
    instance_creators: HashMap<String, Arc<dyn InstanceCreator>>,
}

impl ConstructorConstructor {
    pub fn new(instance_creators: HashMap<String, Arc<dyn InstanceCreator>>) -> Self {
        ConstructorConstructor { instance_creators }
    }

    /// Get the construction strategy for a class.
    pub fn get(&self, ty: &TypeDescriptor, declared_fields: Vec<String>) -> ObjectConstructor {
        if let Some(creator) = self.instance_creators.get(ty.raw_name()) {
            return ObjectConstructor::FromCreator {
                creator: creator.clone(),
                ty: ty.clone(),
            };
        }
        ObjectConstructor::Blank {
            class_name: ty.raw_name().to_string(),
            fields: declared_fields,
        }
    }
}
