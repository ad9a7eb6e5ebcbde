// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Token writer that builds an element tree instead of text.
//!
//! Obeys the same grammar discipline and null policy as the text writer, so
//! an adapter can target either interchangeably.

use crate::core::{BindError, Result};
use crate::element::{JsonArray, JsonElement, JsonObject};
use crate::stream::writer::JsonWritable;

/// Where a finished scope lands when it closes.
enum Slot {
    Root,
    Member(String),
    Item,
}

enum ElementScope {
    Object(JsonObject),
    Array(JsonArray),
}

struct Level {
    slot: Slot,
    scope: ElementScope,
}

/// Token writer producing a [`JsonElement`].
pub struct JsonElementWriter {
    levels: Vec<Level>,
    pending_name: Option<String>,
    root: Option<JsonElement>,
    serialize_null: bool,
}

impl JsonElementWriter {
    pub fn new() -> Self {
        JsonElementWriter {
            levels: Vec::new(),
            pending_name: None,
            root: None,
            serialize_null: true,
        }
    }

    /// Finish and take the produced tree.
    ///
    /// # Errors
    ///
    /// Returns an invalid-write error if a scope is still open or nothing
    /// was written.
    pub fn into_element(self) -> Result<JsonElement> {
        if !self.levels.is_empty() {
            return Err(BindError::invalid_write("unclosed scopes at end of write"));
        }
        self.root
            .ok_or_else(|| BindError::invalid_write("no value was written"))
    }

    /// Claim the slot the next value will occupy.
    fn take_slot(&mut self) -> Result<Slot> {
        match self.levels.last() {
            Some(Level {
                scope: ElementScope::Object(_),
                ..
            }) => self.pending_name.take().map(Slot::Member).ok_or_else(|| {
                BindError::invalid_write("value in object scope requires a preceding name")
            }),
            Some(Level {
                scope: ElementScope::Array(_),
                ..
            }) => Ok(Slot::Item),
            None => {
                if self.root.is_some() {
                    return Err(BindError::invalid_write("multiple top-level values"));
                }
                Ok(Slot::Root)
            }
        }
    }

    fn place(&mut self, slot: Slot, element: JsonElement) -> Result<()> {
        match slot {
            Slot::Root => {
                if self.root.is_some() {
                    return Err(BindError::invalid_write("multiple top-level values"));
                }
                self.root = Some(element);
                Ok(())
            }
            Slot::Member(name) => match self.levels.last_mut() {
                Some(Level {
                    scope: ElementScope::Object(object),
                    ..
                }) => {
                    object.insert(name, element);
                    Ok(())
                }
                _ => Err(BindError::invalid_write("member slot outside object scope")),
            },
            Slot::Item => match self.levels.last_mut() {
                Some(Level {
                    scope: ElementScope::Array(array),
                    ..
                }) => {
                    array.push(element);
                    Ok(())
                }
                _ => Err(BindError::invalid_write("item slot outside array scope")),
            },
        }
    }

    fn write_value(&mut self, element: JsonElement) -> Result<()> {
        let slot = self.take_slot()?;
        self.place(slot, element)
    }
}

impl Default for JsonElementWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWritable for JsonElementWriter {
    fn begin_object(&mut self) -> Result<()> {
        let slot = self.take_slot()?;
        self.levels.push(Level {
            slot,
            scope: ElementScope::Object(JsonObject::new()),
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        if self.pending_name.is_some() {
            return Err(BindError::invalid_write("name staged without a value"));
        }
        match self.levels.pop() {
            Some(Level {
                slot,
                scope: ElementScope::Object(object),
            }) => self.place(slot, JsonElement::Object(object)),
            other => {
                if let Some(level) = other {
                    self.levels.push(level);
                }
                Err(BindError::invalid_write("end_object outside object scope"))
            }
        }
    }

    fn begin_array(&mut self) -> Result<()> {
        let slot = self.take_slot()?;
        self.levels.push(Level {
            slot,
            scope: ElementScope::Array(JsonArray::new()),
        });
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        match self.levels.pop() {
            Some(Level {
                slot,
                scope: ElementScope::Array(array),
            }) => self.place(slot, JsonElement::Array(array)),
            other => {
                if let Some(level) = other {
                    self.levels.push(level);
                }
                Err(BindError::invalid_write("end_array outside array scope"))
            }
        }
    }

    fn name(&mut self, name: &str) -> Result<()> {
        if !matches!(
            self.levels.last(),
            Some(Level {
                scope: ElementScope::Object(_),
                ..
            })
        ) {
            return Err(BindError::invalid_write("name outside object scope"));
        }
        if self.pending_name.is_some() {
            return Err(BindError::invalid_write("name already staged"));
        }
        self.pending_name = Some(name.to_string());
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_value(JsonElement::string(value))
    }

    fn write_integer(&mut self, value: i64) -> Result<()> {
        self.write_value(JsonElement::integer(value))
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(BindError::invalid_write(format!(
                "float {value} is not representable in JSON"
            )));
        }
        self.write_value(JsonElement::float(value))
    }

    fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.write_value(JsonElement::boolean(value))
    }

    fn write_null(&mut self) -> Result<()> {
        if self.serialize_null {
            return self.write_value(JsonElement::Null);
        }
        if self.pending_name.take().is_some() {
            return Ok(());
        }
        match self.levels.last() {
            Some(Level {
                scope: ElementScope::Array(_),
                ..
            }) => Ok(()),
            Some(Level {
                scope: ElementScope::Object(_),
                ..
            }) => Err(BindError::invalid_write(
                "value in object scope requires a preceding name",
            )),
            None => self.write_value(JsonElement::Null),
        }
    }

    fn set_serialize_null(&mut self, serialize_null: bool) {
        self.serialize_null = serialize_null;
    }

    fn serialize_null(&self) -> bool {
        self.serialize_null
    }
}
