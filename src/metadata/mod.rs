// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Class and property metadata: annotations, naming policies, registration
//! specs, and the exclusion engine.

pub mod annotations;
pub mod class;
pub mod excluder;
pub mod naming;
pub mod property;

pub use annotations::{Annotation, AnnotationScope, AnnotationSet};
pub use class::{ClassMetadata, ClassRegistry, ClassSpec, PropertyCollectionFactory, PropertySpec};
pub use excluder::{Excluder, ExclusionStrategy};
pub use naming::PropertyNamingPolicy;
pub use property::{
    modifiers, GetterFn, GetterStrategy, Property, PropertyCollection, SetterFn, SetterStrategy,
};
