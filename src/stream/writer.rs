// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Push-style token writer protocol and the text emitter.
//!
//! Writers enforce the JSON grammar through their own nesting discipline:
//! calling `name` outside an object, closing a scope that was not opened, or
//! leaving a name dangling are configuration-class failures, not recoverable
//! conditions.
//!
//! Null emission honors one policy for the whole write: with serialize-null
//! off, a suppressed null also suppresses the immediately preceding name.

use crate::core::{BindError, Result};

/// An api to emit a JSON structure one token at a time.
pub trait JsonWritable {
    fn begin_object(&mut self) -> Result<()>;

    fn end_object(&mut self) -> Result<()>;

    fn begin_array(&mut self) -> Result<()>;

    fn end_array(&mut self) -> Result<()>;

    /// Stage a member name for the next value.
    fn name(&mut self, name: &str) -> Result<()>;

    fn write_string(&mut self, value: &str) -> Result<()>;

    fn write_integer(&mut self, value: i64) -> Result<()>;

    fn write_float(&mut self, value: f64) -> Result<()>;

    fn write_boolean(&mut self, value: bool) -> Result<()>;

    /// Write a null, or suppress it (and the pending name) when
    /// serialize-null is off.
    fn write_null(&mut self) -> Result<()>;

    /// Set whether nulls are emitted. Applies uniformly for the duration of
    /// one write operation.
    fn set_serialize_null(&mut self, serialize_null: bool);

    fn serialize_null(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Object { members: usize },
    Array { items: usize },
}

/// Token writer emitting compact JSON text into a string.
pub struct JsonTextWriter {
    out: String,
    scopes: Vec<Scope>,
    pending_name: Option<String>,
    serialize_null: bool,
    wrote_root: bool,
}

impl JsonTextWriter {
    pub fn new() -> Self {
        JsonTextWriter {
            out: String::new(),
            scopes: Vec::new(),
            pending_name: None,
            serialize_null: true,
            wrote_root: false,
        }
    }

    /// The text produced so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Finish and take the produced text.
    ///
    /// # Errors
    ///
    /// Returns an invalid-write error if a scope is still open or nothing
    /// was written.
    pub fn into_string(self) -> Result<String> {
        if !self.scopes.is_empty() {
            return Err(BindError::invalid_write("unclosed scopes at end of write"));
        }
        if !self.wrote_root {
            return Err(BindError::invalid_write("no value was written"));
        }
        Ok(self.out)
    }

    /// Emit the separator and any staged name, positioning the output for a
    /// value.
    fn before_value(&mut self) -> Result<()> {
        match self.scopes.last_mut() {
            Some(Scope::Object { members }) => {
                let name = self.pending_name.take().ok_or_else(|| {
                    BindError::invalid_write("value in object scope requires a preceding name")
                })?;
                if *members > 0 {
                    self.out.push(',');
                }
                *members += 1;
                self.out.push_str(&quote(&name)?);
                self.out.push(':');
            }
            Some(Scope::Array { items }) => {
                if *items > 0 {
                    self.out.push(',');
                }
                *items += 1;
            }
            None => {
                if self.wrote_root {
                    return Err(BindError::invalid_write("multiple top-level values"));
                }
                self.wrote_root = true;
            }
        }
        Ok(())
    }
}

impl Default for JsonTextWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWritable for JsonTextWriter {
    fn begin_object(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('{');
        self.scopes.push(Scope::Object { members: 0 });
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        if self.pending_name.is_some() {
            return Err(BindError::invalid_write("name staged without a value"));
        }
        match self.scopes.pop() {
            Some(Scope::Object { .. }) => {
                self.out.push('}');
                Ok(())
            }
            other => {
                if let Some(scope) = other {
                    self.scopes.push(scope);
                }
                Err(BindError::invalid_write("end_object outside object scope"))
            }
        }
    }

    fn begin_array(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('[');
        self.scopes.push(Scope::Array { items: 0 });
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(Scope::Array { .. }) => {
                self.out.push(']');
                Ok(())
            }
            other => {
                if let Some(scope) = other {
                    self.scopes.push(scope);
                }
                Err(BindError::invalid_write("end_array outside array scope"))
            }
        }
    }

    fn name(&mut self, name: &str) -> Result<()> {
        if !matches!(self.scopes.last(), Some(Scope::Object { .. })) {
            return Err(BindError::invalid_write("name outside object scope"));
        }
        if self.pending_name.is_some() {
            return Err(BindError::invalid_write("name already staged"));
        }
        self.pending_name = Some(name.to_string());
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        let quoted = quote(value)?;
        self.out.push_str(&quoted);
        Ok(())
    }

    fn write_integer(&mut self, value: i64) -> Result<()> {
        self.before_value()?;
        self.out.push_str(&value.to_string());
        Ok(())
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| {
            BindError::invalid_write(format!("float {value} is not representable in JSON"))
        })?;
        self.before_value()?;
        self.out.push_str(&number.to_string());
        Ok(())
    }

    fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    fn write_null(&mut self) -> Result<()> {
        if self.serialize_null {
            self.before_value()?;
            self.out.push_str("null");
            return Ok(());
        }
        if self.pending_name.take().is_some() {
            return Ok(());
        }
        match self.scopes.last() {
            Some(Scope::Array { .. }) => Ok(()),
            Some(Scope::Object { .. }) => Err(BindError::invalid_write(
                "value in object scope requires a preceding name",
            )),
            // A bare document of null still emits valid JSON text.
            None => {
                self.before_value()?;
                self.out.push_str("null");
                Ok(())
            }
        }
    }

    fn set_serialize_null(&mut self, serialize_null: bool) {
        self.serialize_null = serialize_null;
    }

    fn serialize_null(&self) -> bool {
        self.serialize_null
    }
}

/// Quote and escape a string for JSON output.
fn quote(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BindError::invalid_write(e.to_string()))
}
