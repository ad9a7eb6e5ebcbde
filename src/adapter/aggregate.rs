// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adapter for the native aggregate type.
//!
//! An aggregate may appear in JSON as an array or an object, against 0, 1,
//! or 2 declared generic parameters:
//! - object shape: 0 generics guesses each value per entry, 1 generic types
//!   every value, 2 generics additionally decode the key through the
//!   key-type adapter;
//! - array shape: sequential values; 2 generics is a declaration error
//!   because a list cannot carry independently typed keys.
//!
//! Per-entry failures are recorded against their key or index and surfaced
//! as one aggregate error while surviving siblings stay populated.

use std::sync::Arc;

use crate::adapter::registry::AdapterRegistry;
use crate::adapter::{TypeAdapter, TypeAdapterFactory};
use crate::core::{Aggregate, AggregateError, AggregateKey, BindError, BindValue, Result};
use crate::stream::{JsonDecodeReader, JsonReadable, JsonToken, JsonWritable};
use crate::ty::{TypeDescriptor, TypeKind};

/// Adapter for list- and map-shaped aggregates.
pub struct AggregateTypeAdapter {
    ty: TypeDescriptor,
    registry: Arc<AdapterRegistry>,
}

impl AggregateTypeAdapter {
    pub fn new(ty: TypeDescriptor, registry: Arc<AdapterRegistry>) -> Self {
        AggregateTypeAdapter { ty, registry }
    }

    /// Decode a raw member name through the declared key type.
    fn decode_key(&self, key_ty: &TypeDescriptor, raw: &str) -> Result<AggregateKey> {
        // String keys are re-quoted so the one-value reader sees a string
        // token; other key types read the raw text as a JSON value.
        let document = if key_ty.is_string() {
            serde_json::to_string(raw).map_err(|e| BindError::malformed_json(e.to_string()))?
        } else {
            raw.to_string()
        };
        // A key that does not parse as a value of the declared type is a
        // per-entry failure, not a document failure.
        let mut reader = JsonDecodeReader::new(&document)
            .map_err(|_| BindError::syntax(key_ty, format!("\"{raw}\""), "$"))?;
        let key = self.registry.get_adapter(key_ty)?.read(&mut reader)?;
        match key {
            BindValue::Integer(index) => Ok(AggregateKey::Index(index)),
            BindValue::String(name) => Ok(AggregateKey::Name(name)),
            other => Err(BindError::declaration(format!(
                "aggregate key must decode to a string or integer, got {}",
                other.type_name()
            ))),
        }
    }

    fn read_object_shaped(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        let generics = self.ty.generics();
        let mut aggregate = Aggregate::new();
        let mut failures = AggregateError::new();

        reader.begin_object()?;
        while reader.has_next() {
            let name = reader.next_name()?;
            let entry: Result<(AggregateKey, BindValue)> = (|| match generics.len() {
                0 => {
                    // A nested object keeps deserializing as an aggregate;
                    // anything else goes through the wildcard.
                    let value_ty = if reader.peek() == JsonToken::BeginObject {
                        TypeDescriptor::aggregate()
                    } else {
                        TypeDescriptor::wildcard()
                    };
                    let value = self.registry.get_adapter(&value_ty)?.read(reader)?;
                    Ok((AggregateKey::Name(name.clone()), value))
                }
                1 => {
                    let value = self.registry.get_adapter(&generics[0])?.read(reader)?;
                    Ok((AggregateKey::Name(name.clone()), value))
                }
                _ => {
                    let key = self.decode_key(&generics[0], &name)?;
                    let value = self.registry.get_adapter(&generics[1])?.read(reader)?;
                    Ok((key, value))
                }
            })();
            match entry {
                Ok((key, value)) => aggregate.insert(key, value),
                Err(error) if error.is_recoverable() => {
                    let nested_aggregate = error.is_aggregate();
                    failures.insert(name, error);
                    if !nested_aggregate {
                        reader.skip_value();
                    }
                }
                Err(error) => return Err(error),
            }
        }
        reader.end_object()?;

        if failures.is_empty() {
            Ok(BindValue::Aggregate(aggregate))
        } else {
            Err(BindError::Aggregate(
                failures.with_partial(BindValue::Aggregate(aggregate)),
            ))
        }
    }

    fn read_array_shaped(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        let generics = self.ty.generics();
        if generics.len() == 2 {
            return Err(BindError::declaration(
                "a list-shaped aggregate may only declare a generic type for the value",
            ));
        }
        let value_ty = generics.first().cloned().unwrap_or_else(TypeDescriptor::wildcard);

        let mut aggregate = Aggregate::new();
        let mut failures = AggregateError::new();
        let mut index: i64 = 0;

        reader.begin_array()?;
        while reader.has_next() {
            match self
                .registry
                .get_adapter(&value_ty)
                .and_then(|adapter| adapter.read(reader))
            {
                Ok(value) => aggregate.insert(AggregateKey::Index(index), value),
                Err(error) if error.is_recoverable() => {
                    let nested_aggregate = error.is_aggregate();
                    failures.insert(index.to_string(), error);
                    if !nested_aggregate {
                        reader.skip_value();
                    }
                }
                Err(error) => return Err(error),
            }
            index += 1;
        }
        reader.end_array()?;

        if failures.is_empty() {
            Ok(BindValue::Aggregate(aggregate))
        } else {
            Err(BindError::Aggregate(
                failures.with_partial(BindValue::Aggregate(aggregate)),
            ))
        }
    }
}

impl TypeAdapter for AggregateTypeAdapter {
    fn read(&self, reader: &mut dyn JsonReadable) -> Result<BindValue> {
        match reader.peek() {
            JsonToken::Null => {
                reader.next_null()?;
                Ok(BindValue::Null)
            }
            JsonToken::BeginObject => self.read_object_shaped(reader),
            JsonToken::BeginArray => self.read_array_shaped(reader),
            token => Err(BindError::syntax(
                "begin-object or begin-array",
                token,
                reader.path(),
            )),
        }
    }

    fn write(&self, writer: &mut dyn JsonWritable, value: &BindValue) -> Result<()> {
        let aggregate = match value {
            BindValue::Null => return writer.write_null(),
            BindValue::Aggregate(aggregate) => aggregate,
            other => return Err(BindError::type_mismatch("aggregate", other.type_name())),
        };

        let generics = self.ty.generics();
        // Two generics always write an object; otherwise the natural keys
        // decide: integers counting up from zero write an array.
        let object_shaped = generics.len() == 2 || !aggregate.is_sequential();

        if object_shaped {
            writer.begin_object()?;
        } else {
            writer.begin_array()?;
        }

        for (key, item) in aggregate.iter() {
            if object_shaped {
                writer.name(&key.to_string())?;
            }
            let adapter = match generics.len() {
                0 => self.registry.get_adapter(&TypeDescriptor::from_value(item))?,
                1 => self.registry.get_adapter(&generics[0])?,
                _ => self.registry.get_adapter(&generics[1])?,
            };
            adapter.write(writer, item)?;
        }

        if object_shaped {
            writer.end_object()
        } else {
            writer.end_array()
        }
    }
}

/// Factory for aggregate adapters. Generic arity is validated here so a bad
/// declaration fails before any data flows.
pub struct AggregateTypeAdapterFactory;

impl TypeAdapterFactory for AggregateTypeAdapterFactory {
    fn supports(&self, ty: &TypeDescriptor) -> bool {
        ty.kind() == TypeKind::Aggregate
    }

    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &Arc<AdapterRegistry>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        if ty.generics().len() > 2 {
            return Err(BindError::too_many_generics(
                ty.to_string(),
                ty.generics().len(),
            ));
        }
        Ok(Arc::new(AggregateTypeAdapter::new(
            ty.clone(),
            registry.clone(),
        )))
    }
}
