// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for jsonbind.
//!
//! Covers the four failure families:
//! - Token/grammar errors raised by the readers
//! - Aggregate per-key errors carrying partial results
//! - Configuration and declaration errors (always fatal)
//! - Malformed type-grammar and document errors

use std::fmt;

use indexmap::IndexMap;

use crate::core::value::BindValue;

/// Errors that can occur while binding values to and from JSON.
#[derive(Debug, Clone)]
pub enum BindError {
    /// A typed read did not find the token it asserted
    Syntax {
        /// Token the caller asserted
        expected: String,
        /// Token actually present
        actual: String,
        /// Path of the consumed prefix when the assertion failed
        path: String,
    },

    /// Input text is not valid JSON
    MalformedJson {
        /// Parser message
        message: String,
    },

    /// One or more children of an object or aggregate failed while their
    /// siblings succeeded
    Aggregate(AggregateError),

    /// No registered factory supports the requested type
    NoAdapter {
        /// Display form of the requested type
        type_name: String,
    },

    /// A type declared more generic parameters than its adapter accepts
    TooManyGenerics {
        /// Display form of the offending type
        type_name: String,
        /// Number of generics declared
        count: usize,
    },

    /// Invalid declaration or builder configuration
    Declaration {
        /// What was declared incorrectly
        message: String,
    },

    /// A type-descriptor grammar string failed to parse
    MalformedType {
        /// The string as given
        given: String,
        /// Why it failed
        reason: String,
    },

    /// A value of the wrong kind was handed to a write operation
    TypeMismatch {
        /// Kind the adapter writes
        expected: String,
        /// Kind of the value received
        actual: String,
    },

    /// The token writer was driven outside the JSON grammar
    InvalidWrite {
        /// What went wrong
        message: String,
    },
}

impl BindError {
    /// Create a syntax error from an expectation, the actual token, and the
    /// reader path.
    pub fn syntax(
        expected: impl fmt::Display,
        actual: impl fmt::Display,
        path: impl Into<String>,
    ) -> Self {
        BindError::Syntax {
            expected: expected.to_string(),
            actual: actual.to_string(),
            path: path.into(),
        }
    }

    /// Create a malformed-document error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        BindError::MalformedJson {
            message: message.into(),
        }
    }

    /// Create a "no adapter found" error.
    pub fn no_adapter(type_name: impl Into<String>) -> Self {
        BindError::NoAdapter {
            type_name: type_name.into(),
        }
    }

    /// Create a generic-arity error.
    pub fn too_many_generics(type_name: impl Into<String>, count: usize) -> Self {
        BindError::TooManyGenerics {
            type_name: type_name.into(),
            count,
        }
    }

    /// Create a declaration/configuration error.
    pub fn declaration(message: impl Into<String>) -> Self {
        BindError::Declaration {
            message: message.into(),
        }
    }

    /// Create a malformed type-grammar error.
    pub fn malformed_type(given: impl Into<String>, reason: impl Into<String>) -> Self {
        BindError::MalformedType {
            given: given.into(),
            reason: reason.into(),
        }
    }

    /// Create a write-side value kind mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        BindError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a writer misuse error.
    pub fn invalid_write(message: impl Into<String>) -> Self {
        BindError::InvalidWrite {
            message: message.into(),
        }
    }

    /// True for the aggregate per-key variant.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, BindError::Aggregate(_))
    }

    /// True for failures a consuming adapter may recover from by skipping
    /// the offending value and continuing with siblings.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BindError::Syntax { .. } | BindError::Aggregate(_))
    }

    /// Borrow the aggregate payload, if this is an aggregate error.
    pub fn as_aggregate(&self) -> Option<&AggregateError> {
        match self {
            BindError::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            BindError::Syntax {
                expected,
                actual,
                path,
            } => vec![
                ("expected", expected.clone()),
                ("actual", actual.clone()),
                ("path", path.clone()),
            ],
            BindError::MalformedJson { message } => vec![("message", message.clone())],
            BindError::Aggregate(aggregate) => vec![
                ("failed_keys", aggregate.len().to_string()),
                ("keys", aggregate.keys().collect::<Vec<_>>().join(",")),
            ],
            BindError::NoAdapter { type_name } => vec![("type", type_name.clone())],
            BindError::TooManyGenerics { type_name, count } => vec![
                ("type", type_name.clone()),
                ("generics", count.to_string()),
            ],
            BindError::Declaration { message } => vec![("message", message.clone())],
            BindError::MalformedType { given, reason } => {
                vec![("given", given.clone()), ("reason", reason.clone())]
            }
            BindError::TypeMismatch { expected, actual } => {
                vec![("expected", expected.clone()), ("actual", actual.clone())]
            }
            BindError::InvalidWrite { message } => vec![("message", message.clone())],
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Syntax {
                expected,
                actual,
                path,
            } => {
                write!(f, "Expected \"{expected}\", but found \"{actual}\" at \"{path}\"")
            }
            BindError::MalformedJson { message } => {
                write!(f, "Could not decode json: {message}")
            }
            BindError::Aggregate(aggregate) => write!(f, "{aggregate}"),
            BindError::NoAdapter { type_name } => {
                write!(f, "No type adapter found for type '{type_name}'")
            }
            BindError::TooManyGenerics { type_name, count } => write!(
                f,
                "Type '{type_name}' declares {count} generic types, but at most 2 are allowed"
            ),
            BindError::Declaration { message } => {
                write!(f, "Invalid declaration: {message}")
            }
            BindError::MalformedType { given, reason } => {
                write!(f, "Malformed type '{given}': {reason}")
            }
            BindError::TypeMismatch { expected, actual } => {
                write!(f, "Cannot write a {actual} value where a {expected} is declared")
            }
            BindError::InvalidWrite { message } => {
                write!(f, "Invalid write: {message}")
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Result type for jsonbind operations.
pub type Result<T> = std::result::Result<T, BindError>;

// =============================================================================
// Aggregate Error
// =============================================================================

/// Per-key failures recorded while reading an object or aggregate.
///
/// Each entry maps a property name or index to the error its value raised.
/// The partially-populated result is carried alongside so callers can choose
/// between failing outright and inspecting what did decode.
#[derive(Debug, Clone, Default)]
pub struct AggregateError {
    errors: IndexMap<String, BindError>,
    partial: Option<Box<BindValue>>,
}

impl AggregateError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure against a key. A later failure for the same key
    /// replaces the earlier one.
    pub fn insert(&mut self, key: impl Into<String>, error: BindError) {
        self.errors.insert(key.into(), error);
    }

    /// Attach the partially-populated value.
    pub fn with_partial(mut self, partial: BindValue) -> Self {
        self.partial = Some(Box::new(partial));
        self
    }

    pub fn get(&self, key: &str) -> Option<&BindError> {
        self.errors.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BindError)> {
        self.errors.iter()
    }

    /// The value that was still constructed and partially populated, if the
    /// producing adapter recorded one.
    pub fn partial(&self) -> Option<&BindValue> {
        self.partial.as_deref()
    }

    /// Flatten the error tree into `(dotted key path, message)` pairs,
    /// recursing through nested aggregate failures.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut flat = Vec::new();
        self.flatten_into("", &mut flat);
        flat
    }

    fn flatten_into(&self, prefix: &str, flat: &mut Vec<(String, String)>) {
        for (key, error) in &self.errors {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match error {
                BindError::Aggregate(nested) => nested.flatten_into(&path, flat),
                other => flat.push((path, other.to_string())),
            }
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<&str> = self.errors.keys().map(String::as_str).collect();
        write!(
            f,
            "{} value(s) failed to bind: [{}]",
            self.errors.len(),
            failed.join(", ")
        )
    }
}
