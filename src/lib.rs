// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # jsonbind
//!
//! Metadata-driven JSON serialization: maps between JSON (text or element
//! trees) and dynamic typed object graphs, driven by per-class metadata
//! (annotations, naming policies, exclusion rules, custom adapters) rather
//! than per-type code.
//!
//! ## Architecture
//!
//! - `core/` - Dynamic value model and error taxonomy
//! - `element/` - In-memory JSON element trees
//! - `ty/` - Type descriptors (parseable, comparable, cache keys)
//! - `stream/` - Pull-style token readers and push-style writers over text
//!   and element trees
//! - `metadata/` - Class/property metadata, annotations, naming policies,
//!   and the exclusion engine
//! - `instance/` - Instance construction strategies
//! - `adapter/` - Type adapters, factories, and the caching registry
//! - `bind/` - The engine façade and its builder
//!
//! ## Example: binding a registered class
//!
//! ```rust
//! use jsonbind::{BindValue, ClassSpec, JsonBind, PropertySpec};
//!
//! # fn main() -> jsonbind::Result<()> {
//! let engine = JsonBind::builder()
//!     .register_class(
//!         ClassSpec::new("User")
//!             .property(PropertySpec::new("id").with_type("int"))
//!             .property(PropertySpec::new("name").with_type("string")),
//!     )
//!     .build()?;
//!
//! let user = engine.from_json(r#"{"id": 1, "name": "ada"}"#, "User")?;
//! assert_eq!(
//!     user.as_object().unwrap().get("name"),
//!     Some(&BindValue::from("ada"))
//! );
//! assert_eq!(engine.to_json(&user)?, r#"{"id":1,"name":"ada"}"#);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{Aggregate, AggregateError, AggregateKey, BindError, BindValue, Instance, Result};

// JSON element trees
pub mod element;

pub use element::{JsonArray, JsonElement, JsonObject, JsonPrimitive};

// Type descriptors
pub mod ty;

pub use ty::{TypeDescriptor, TypeKind, TypeParseError};

// Token readers and writers
pub mod stream;

pub use stream::{
    JsonDecodeReader, JsonElementReader, JsonElementWriter, JsonNumber, JsonReadable,
    JsonTextWriter, JsonToken, JsonWritable,
};

// Class and property metadata, exclusion policy
pub mod metadata;

pub use metadata::{
    modifiers, Annotation, AnnotationScope, AnnotationSet, ClassMetadata, ClassSpec, Excluder,
    ExclusionStrategy, GetterFn, Property, PropertyNamingPolicy, PropertySpec, SetterFn,
};

// Instance construction
pub mod instance;

pub use instance::InstanceCreator;

// Type adapters and the registry
pub mod adapter;

pub use adapter::{
    AdapterRegistry, DeserializationContext, JsonDeserializer, JsonSerializer, NamedRegistration,
    SerializationContext, TypeAdapter, TypeAdapterFactory,
};

// Engine façade
pub mod bind;

pub use bind::{JsonBind, JsonBindBuilder};
