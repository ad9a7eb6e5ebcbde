// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Type descriptors.
//!
//! A [`TypeDescriptor`] is the normalized, comparable representation of a
//! declared or runtime type: a raw name, the kind the name normalizes to, and
//! ordered generic parameters. Descriptors are parsed from a string grammar
//! (`"array<int>"`, `"Map<string,User>"`), derived from runtime values, and
//! used as adapter cache keys, so equality and hashing are structural.

use std::fmt;

use thiserror::Error;

use crate::core::{BindError, BindValue};

/// Error raised when a type-grammar string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("unbalanced generic brackets in '{0}'")]
    UnbalancedBrackets(String),

    #[error("empty type name in '{0}'")]
    EmptyName(String),

    #[error("unexpected characters after generic list in '{0}'")]
    TrailingInput(String),
}

impl From<TypeParseError> for BindError {
    fn from(err: TypeParseError) -> Self {
        let given = match &err {
            TypeParseError::UnbalancedBrackets(s)
            | TypeParseError::EmptyName(s)
            | TypeParseError::TrailingInput(s) => s.clone(),
        };
        BindError::malformed_type(given, err.to_string())
    }
}

/// The normalized kind of a raw type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Boolean
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// String
    String,
    /// The native aggregate (list or map shaped)
    Aggregate,
    /// A registered class
    Object,
    /// A raw JSON element tree
    Element,
    /// The null type
    Null,
    /// Unknown declared type; resolved from the runtime value's shape.
    /// Distinct from a resolution failure.
    Wildcard,
}

/// A normalized type with ordered generic parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: String,
    kind: TypeKind,
    generics: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Create a descriptor with no generic parameters.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = normalize(&raw);
        TypeDescriptor {
            raw,
            kind,
            generics: Vec::new(),
        }
    }

    /// Create a descriptor with generic parameters.
    pub fn with_generics(raw: impl Into<String>, generics: Vec<TypeDescriptor>) -> Self {
        let raw = raw.into();
        let kind = normalize(&raw);
        TypeDescriptor { raw, kind, generics }
    }

    /// The wildcard descriptor.
    pub fn wildcard() -> Self {
        TypeDescriptor::new("?")
    }

    /// The bare aggregate descriptor.
    pub fn aggregate() -> Self {
        TypeDescriptor::new("array")
    }

    /// Parse a descriptor from the type grammar.
    ///
    /// The grammar is a name optionally followed by a bracketed,
    /// comma-separated generic list, recursively: `"int"`, `"array<int>"`,
    /// `"Map<string, array<User>>"`.
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let (descriptor, rest) = parse_one(input.trim(), input)?;
        if !rest.trim().is_empty() {
            return Err(TypeParseError::TrailingInput(input.to_string()));
        }
        Ok(descriptor)
    }

    /// Derive a descriptor from a runtime value.
    pub fn from_value(value: &BindValue) -> Self {
        match value {
            BindValue::Null => TypeDescriptor::new("null"),
            BindValue::Bool(_) => TypeDescriptor::new("boolean"),
            BindValue::Integer(_) => TypeDescriptor::new("integer"),
            BindValue::Float(_) => TypeDescriptor::new("float"),
            BindValue::String(_) => TypeDescriptor::new("string"),
            BindValue::Aggregate(_) => TypeDescriptor::aggregate(),
            BindValue::Object(instance) => TypeDescriptor::new(instance.class_name()),
            BindValue::Tree(_) => TypeDescriptor::new("element"),
        }
    }

    pub fn raw_name(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn generics(&self) -> &[TypeDescriptor] {
        &self.generics
    }

    pub fn generic(&self, index: usize) -> Option<&TypeDescriptor> {
        self.generics.get(index)
    }

    pub fn is_object(&self) -> bool {
        self.kind == TypeKind::Object
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind == TypeKind::Aggregate
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind == TypeKind::Wildcard
    }

    pub fn is_null(&self) -> bool {
        self.kind == TypeKind::Null
    }

    pub fn is_string(&self) -> bool {
        self.kind == TypeKind::String
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if !self.generics.is_empty() {
            write!(f, "<")?;
            for (i, generic) in self.generics.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{generic}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Map a raw name to its kind. Unknown names are classes.
fn normalize(raw: &str) -> TypeKind {
    match raw.to_ascii_lowercase().as_str() {
        "bool" | "boolean" => TypeKind::Boolean,
        "int" | "integer" => TypeKind::Integer,
        "float" | "double" => TypeKind::Float,
        "string" => TypeKind::String,
        "array" | "list" | "map" | "dict" => TypeKind::Aggregate,
        "element" | "jsonelement" => TypeKind::Element,
        "null" => TypeKind::Null,
        "?" | "wildcard" => TypeKind::Wildcard,
        _ => TypeKind::Object,
    }
}

/// Parse one descriptor from the front of `input`, returning the remainder.
/// `original` is the full string, used for error reporting.
fn parse_one<'a>(
    input: &'a str,
    original: &str,
) -> Result<(TypeDescriptor, &'a str), TypeParseError> {
    let name_end = input
        .find(|c| c == '<' || c == ',' || c == '>')
        .unwrap_or(input.len());
    let name = input[..name_end].trim();
    if name.is_empty() {
        return Err(TypeParseError::EmptyName(original.to_string()));
    }

    let mut rest = &input[name_end..];
    if !rest.starts_with('<') {
        return Ok((TypeDescriptor::new(name), rest));
    }

    rest = &rest[1..];
    let mut generics = Vec::new();
    loop {
        let (generic, after) = parse_one(rest.trim_start(), original)?;
        generics.push(generic);
        rest = after.trim_start();
        if let Some(stripped) = rest.strip_prefix(',') {
            rest = stripped;
            continue;
        }
        if let Some(stripped) = rest.strip_prefix('>') {
            return Ok((TypeDescriptor::with_generics(name, generics), stripped));
        }
        return Err(TypeParseError::UnbalancedBrackets(original.to_string()));
    }
}
