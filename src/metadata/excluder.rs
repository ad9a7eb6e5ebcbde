// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Exclusion engine.
//!
//! Combines structural rules (modifier bits), declarative rules (version
//! bounds, explicit exclude/expose, require-expose mode), and user-supplied
//! strategies evaluated per direction. Annotation-driven results are computed
//! once at adapter-construction time and cached as property skip flags;
//! strategies are re-evaluated per call because they may carry per-call
//! state.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::metadata::annotations::{AnnotationScope, AnnotationSet};
use crate::metadata::class::ClassMetadata;
use crate::metadata::property::{modifiers, Property};

/// User-pluggable predicate deciding per-class/per-property inclusion,
/// independent of static annotations.
pub trait ExclusionStrategy: Send + Sync {
    fn should_skip_class(&self, _class: &ClassMetadata) -> bool {
        false
    }

    fn should_skip_property(&self, _property: &Property) -> bool {
        false
    }
}

/// The configured exclusion policy.
pub struct Excluder {
    version: Option<String>,
    excluded_modifiers: u32,
    require_expose: bool,
    serialization_strategies: Vec<Arc<dyn ExclusionStrategy>>,
    deserialization_strategies: Vec<Arc<dyn ExclusionStrategy>>,
}

impl Default for Excluder {
    fn default() -> Self {
        Excluder {
            version: None,
            excluded_modifiers: modifiers::STATIC,
            require_expose: false,
            serialization_strategies: Vec::new(),
            deserialization_strategies: Vec::new(),
        }
    }
}

impl Excluder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version tested against `Since`/`Until` annotations.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// Set the modifier bits that exclude a property outright.
    pub fn set_excluded_modifiers(&mut self, modifiers: u32) {
        self.excluded_modifiers = modifiers;
    }

    /// Require an `Expose` annotation for a member to participate at all.
    pub fn set_require_expose(&mut self, require_expose: bool) {
        self.require_expose = require_expose;
    }

    /// Add a strategy for one or both directions.
    pub fn add_strategy(
        &mut self,
        strategy: Arc<dyn ExclusionStrategy>,
        serialization: bool,
        deserialization: bool,
    ) {
        if serialization {
            self.serialization_strategies.push(strategy.clone());
        }
        if deserialization {
            self.deserialization_strategies.push(strategy);
        }
    }

    /// True if annotations exclude the class for the given direction.
    pub fn exclude_class(&self, class: &ClassMetadata, serialize: bool) -> bool {
        self.exclude_by_annotations(class.annotations(), serialize, AnnotationScope::Class)
    }

    /// True if any registered strategy skips the class for the given
    /// direction.
    pub fn exclude_class_by_strategy(&self, class: &ClassMetadata, serialize: bool) -> bool {
        self.strategies(serialize)
            .iter()
            .any(|strategy| strategy.should_skip_class(class))
    }

    /// True if the property's modifiers or annotations exclude it for the
    /// given direction.
    pub fn exclude_property(&self, property: &Property, serialize: bool) -> bool {
        if self.excluded_modifiers & property.modifiers() != 0 {
            return true;
        }
        self.exclude_by_annotations(
            property.annotations(),
            serialize,
            property.annotation_scope(),
        )
    }

    /// True if any registered strategy skips the property for the given
    /// direction.
    pub fn exclude_property_by_strategy(&self, property: &Property, serialize: bool) -> bool {
        self.strategies(serialize)
            .iter()
            .any(|strategy| strategy.should_skip_property(property))
    }

    fn strategies(&self, serialize: bool) -> &[Arc<dyn ExclusionStrategy>] {
        if serialize {
            &self.serialization_strategies
        } else {
            &self.deserialization_strategies
        }
    }

    fn exclude_by_annotations(
        &self,
        annotations: &AnnotationSet,
        serialize: bool,
        scope: AnnotationScope,
    ) -> bool {
        if !self.valid_version(annotations, scope) {
            return true;
        }

        if let Some((on_serialize, on_deserialize)) = annotations.exclude(scope) {
            let applies = if serialize { on_serialize } else { on_deserialize };
            if applies {
                return true;
            }
        }

        if self.require_expose {
            match annotations.expose(scope) {
                Some((on_serialize, on_deserialize)) => {
                    let exposed = if serialize { on_serialize } else { on_deserialize };
                    if !exposed {
                        return true;
                    }
                }
                None => return true,
            }
        }

        false
    }

    fn valid_version(&self, annotations: &AnnotationSet, scope: AnnotationScope) -> bool {
        !self.skip_since(annotations, scope) && !self.skip_until(annotations, scope)
    }

    /// A `Since` bound excludes while the configured version is below it.
    fn skip_since(&self, annotations: &AnnotationSet, scope: AnnotationScope) -> bool {
        match (&self.version, annotations.since(scope)) {
            (Some(version), Some(since)) => {
                compare_versions(version, since) == Ordering::Less
            }
            _ => false,
        }
    }

    /// An `Until` bound excludes from the boundary version on.
    fn skip_until(&self, annotations: &AnnotationSet, scope: AnnotationScope) -> bool {
        match (&self.version, annotations.until(scope)) {
            (Some(version), Some(until)) => {
                compare_versions(version, until) != Ordering::Less
            }
            _ => false,
        }
    }
}

/// Compare dotted versions numerically per segment; missing segments read as
/// zero.
pub(crate) fn compare_versions(left: &str, right: &str) -> Ordering {
    let mut lhs = left.split('.').map(parse_segment);
    let mut rhs = right.split('.').map(parse_segment);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let ordering = l.unwrap_or(0).cmp(&r.unwrap_or(0));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn parse_segment(segment: &str) -> u64 {
    segment.trim().parse().unwrap_or(0)
}
