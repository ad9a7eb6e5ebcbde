// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Declarative annotations attached to classes and properties.
//!
//! Annotations are registered alongside class specs and queried by the
//! exclusion engine and the reflective adapter. Every annotation carries the
//! scope it was declared at; property-level checks look at property-scoped
//! annotations for field-backed properties and method-scoped annotations for
//! virtual ones.

/// Where an annotation was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationScope {
    Class,
    Property,
    Method,
}

/// A single declarative annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Override the serialized member name.
    SerializedName(String),

    /// Declare the property type in the type grammar.
    TypeHint(String),

    /// Expose the member per direction; meaningful in require-expose mode.
    Expose { serialize: bool, deserialize: bool },

    /// Exclude the member per direction.
    Exclude { serialize: bool, deserialize: bool },

    /// Include only from this version on.
    Since(String),

    /// Exclude from this version on (the boundary itself is excluded).
    Until(String),

    /// Marks a method-backed, serialize-only pseudo-property.
    VirtualProperty,

    /// Delegate to a named adapter registration.
    Adapter(String),
}

impl Annotation {
    /// An `Expose` covering both directions.
    pub fn expose() -> Self {
        Annotation::Expose {
            serialize: true,
            deserialize: true,
        }
    }

    /// An `Exclude` covering both directions.
    pub fn exclude() -> Self {
        Annotation::Exclude {
            serialize: true,
            deserialize: true,
        }
    }
}

/// The queryable set of annotations for one class or property, partitioned
/// by declaration scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    class: Vec<Annotation>,
    property: Vec<Annotation>,
    method: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scope: AnnotationScope, annotation: Annotation) {
        self.scope_entries_mut(scope).push(annotation);
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_empty() && self.property.is_empty() && self.method.is_empty()
    }

    fn scope_entries(&self, scope: AnnotationScope) -> &[Annotation] {
        match scope {
            AnnotationScope::Class => &self.class,
            AnnotationScope::Property => &self.property,
            AnnotationScope::Method => &self.method,
        }
    }

    fn scope_entries_mut(&mut self, scope: AnnotationScope) -> &mut Vec<Annotation> {
        match scope {
            AnnotationScope::Class => &mut self.class,
            AnnotationScope::Property => &mut self.property,
            AnnotationScope::Method => &mut self.method,
        }
    }

    pub fn serialized_name(&self, scope: AnnotationScope) -> Option<&str> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::SerializedName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn type_hint(&self, scope: AnnotationScope) -> Option<&str> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::TypeHint(ty) => Some(ty.as_str()),
            _ => None,
        })
    }

    pub fn since(&self, scope: AnnotationScope) -> Option<&str> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::Since(version) => Some(version.as_str()),
            _ => None,
        })
    }

    pub fn until(&self, scope: AnnotationScope) -> Option<&str> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::Until(version) => Some(version.as_str()),
            _ => None,
        })
    }

    /// The `(serialize, deserialize)` flags of an `Exclude`, if present.
    pub fn exclude(&self, scope: AnnotationScope) -> Option<(bool, bool)> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::Exclude {
                serialize,
                deserialize,
            } => Some((*serialize, *deserialize)),
            _ => None,
        })
    }

    /// The `(serialize, deserialize)` flags of an `Expose`, if present.
    pub fn expose(&self, scope: AnnotationScope) -> Option<(bool, bool)> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::Expose {
                serialize,
                deserialize,
            } => Some((*serialize, *deserialize)),
            _ => None,
        })
    }

    pub fn adapter(&self, scope: AnnotationScope) -> Option<&str> {
        self.scope_entries(scope).iter().find_map(|a| match a {
            Annotation::Adapter(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn is_virtual(&self, scope: AnnotationScope) -> bool {
        self.scope_entries(scope)
            .iter()
            .any(|a| matches!(a, Annotation::VirtualProperty))
    }
}
