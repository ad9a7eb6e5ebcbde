// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic value model.
//!
//! Provides a unified in-memory representation for every value the engine can
//! read or write: scalars, the native aggregate (which may surface as a JSON
//! array or a JSON object), typed object instances, and raw element trees.
//! All variants are serde-serializable.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::element::JsonElement;

/// A value flowing between the token stream and the object graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BindValue {
    /// Absent value.
    Null,

    /// Boolean.
    Bool(bool),

    /// 64-bit signed integer.
    Integer(i64),

    /// 64-bit float.
    Float(f64),

    /// UTF-8 string.
    String(String),

    /// The native aggregate: an ordered, keyed collection that maps to a
    /// JSON array or a JSON object depending on its keys.
    Aggregate(Aggregate),

    /// A typed object instance backed by registered class metadata.
    Object(Instance),

    /// A raw JSON element tree.
    Tree(JsonElement),
}

impl BindValue {
    pub fn is_null(&self) -> bool {
        matches!(self, BindValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, BindValue::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, BindValue::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, BindValue::Float(_))
    }

    /// Check if this value is an integer or a float.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, BindValue::String(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, BindValue::Aggregate(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, BindValue::Object(_))
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, BindValue::Tree(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BindValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            BindValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the numeric value as a float. Integers widen without loss over
    /// the exactly-representable range.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            BindValue::Integer(i) => Some(*i as f64),
            BindValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BindValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&Aggregate> {
        match self {
            BindValue::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_aggregate_mut(&mut self) -> Option<&mut Aggregate> {
        match self {
            BindValue::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            BindValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Instance> {
        match self {
            BindValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&JsonElement> {
        match self {
            BindValue::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// Get the kind of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            BindValue::Null => "null",
            BindValue::Bool(_) => "boolean",
            BindValue::Integer(_) => "integer",
            BindValue::Float(_) => "float",
            BindValue::String(_) => "string",
            BindValue::Aggregate(_) => "aggregate",
            BindValue::Object(_) => "object",
            BindValue::Tree(_) => "element",
        }
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Null => write!(f, "null"),
            BindValue::Bool(b) => write!(f, "{b}"),
            BindValue::Integer(i) => write!(f, "{i}"),
            BindValue::Float(v) => write!(f, "{v}"),
            BindValue::String(s) => write!(f, "\"{s}\""),
            BindValue::Aggregate(a) => write!(f, "[{} entries]", a.len()),
            BindValue::Object(o) => write!(f, "{}{{{} fields}}", o.class_name(), o.len()),
            BindValue::Tree(t) => write!(f, "{t}"),
        }
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        BindValue::Bool(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Integer(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Float(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::String(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::String(value)
    }
}

// =============================================================================
// Aggregate
// =============================================================================

/// A key in an [`Aggregate`].
///
/// Decoding a map with a declared key type may produce integer keys, so keys
/// are typed rather than forced through strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AggregateKey {
    /// Integer key.
    Index(i64),
    /// String key.
    Name(String),
}

impl AggregateKey {
    pub fn name(value: impl Into<String>) -> Self {
        AggregateKey::Name(value.into())
    }

    pub fn index(value: i64) -> Self {
        AggregateKey::Index(value)
    }
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateKey::Index(i) => write!(f, "{i}"),
            AggregateKey::Name(s) => write!(f, "{s}"),
        }
    }
}

/// The single native aggregate type.
///
/// An ordered sequence of key/value entries that can behave as a list
/// (sequential integer keys from zero) or as a map (anything else). Inserting
/// under an existing key replaces that entry in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregate {
    entries: Vec<(AggregateKey, BindValue)>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list-shaped aggregate with sequential integer keys.
    pub fn from_list(items: impl IntoIterator<Item = BindValue>) -> Self {
        Aggregate {
            entries: items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (AggregateKey::Index(i as i64), v))
                .collect(),
        }
    }

    /// Build a map-shaped aggregate with string keys.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, BindValue)>) -> Self {
        Aggregate {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (AggregateKey::Name(k), v))
                .collect(),
        }
    }

    /// Insert an entry, replacing any entry with an equal key.
    pub fn insert(&mut self, key: AggregateKey, value: BindValue) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Append a value under the next sequential integer key.
    pub fn push(&mut self, value: BindValue) {
        let index = self.entries.len() as i64;
        self.entries.push((AggregateKey::Index(index), value));
    }

    pub fn get(&self, key: &AggregateKey) -> Option<&BindValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_name(&self, name: &str) -> Option<&BindValue> {
        self.get(&AggregateKey::Name(name.to_string()))
    }

    pub fn get_index(&self, index: i64) -> Option<&BindValue> {
        self.get(&AggregateKey::Index(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AggregateKey, BindValue)> {
        self.entries.iter()
    }

    /// True if the keys are integers counting up from zero, which makes the
    /// aggregate serialize as a JSON array.
    pub fn is_sequential(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| *key == AggregateKey::Index(i as i64))
    }
}

impl IntoIterator for Aggregate {
    type Item = (AggregateKey, BindValue);
    type IntoIter = std::vec::IntoIter<(AggregateKey, BindValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// Instance
// =============================================================================

/// A typed object instance: a class name plus ordered named fields.
///
/// Instances are produced by the construction strategies and populated
/// through accessor strategies; the engine itself never assumes anything
/// about field layout beyond name lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance {
    class_name: String,
    fields: IndexMap<String, BindValue>,
}

impl Instance {
    /// Create an empty instance of the named class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Instance {
            class_name: class_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Create an instance with declared fields seeded to null.
    pub fn with_declared_fields<'a>(
        class_name: impl Into<String>,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Instance {
            class_name: class_name.into(),
            fields: fields
                .into_iter()
                .map(|name| (name.to_string(), BindValue::Null))
                .collect(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn get(&self, field: &str) -> Option<&BindValue> {
        self.fields.get(field)
    }

    /// Set a field value, adding the field if it was not declared.
    pub fn set(&mut self, field: impl Into<String>, value: BindValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &BindValue)> {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_checking() {
        assert!(BindValue::Integer(42).is_numeric());
        assert!(BindValue::Float(2.5).is_numeric());
        assert!(!BindValue::Float(2.5).is_integer());
        assert!(!BindValue::String("hello".to_string()).is_numeric());
        assert!(BindValue::Null.is_null());
    }

    #[test]
    fn test_as_float_widens_integers() {
        assert_eq!(BindValue::Integer(42).as_float(), Some(42.0));
        assert_eq!(BindValue::Float(2.5).as_float(), Some(2.5));
        assert_eq!(BindValue::String("x".to_string()).as_float(), None);
    }

    #[test]
    fn test_as_integer_is_strict() {
        assert_eq!(BindValue::Integer(42).as_integer(), Some(42));
        assert_eq!(BindValue::Float(2.5).as_integer(), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(BindValue::Null.type_name(), "null");
        assert_eq!(BindValue::Bool(true).type_name(), "boolean");
        assert_eq!(BindValue::Integer(0).type_name(), "integer");
        assert_eq!(BindValue::Float(0.0).type_name(), "float");
        assert_eq!(BindValue::String(String::new()).type_name(), "string");
        assert_eq!(BindValue::Aggregate(Aggregate::new()).type_name(), "aggregate");
        assert_eq!(BindValue::Object(Instance::new("Foo")).type_name(), "object");
    }

    #[test]
    fn test_aggregate_sequential() {
        let list = Aggregate::from_list([BindValue::from("a"), BindValue::from("b")]);
        assert!(list.is_sequential());

        let map = Aggregate::from_pairs([("x".to_string(), BindValue::from("a"))]);
        assert!(!map.is_sequential());

        let mut gapped = Aggregate::new();
        gapped.insert(AggregateKey::Index(1), BindValue::from("a"));
        assert!(!gapped.is_sequential());

        assert!(Aggregate::new().is_sequential());
    }

    #[test]
    fn test_aggregate_insert_replaces() {
        let mut agg = Aggregate::new();
        agg.insert(AggregateKey::name("a"), BindValue::Integer(1));
        agg.insert(AggregateKey::name("b"), BindValue::Integer(2));
        agg.insert(AggregateKey::name("a"), BindValue::Integer(3));

        assert_eq!(agg.len(), 2);
        assert_eq!(agg.get_name("a"), Some(&BindValue::Integer(3)));

        let keys: Vec<String> = agg.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_aggregate_push_appends_indices() {
        let mut agg = Aggregate::new();
        agg.push(BindValue::from("a"));
        agg.push(BindValue::from("b"));

        assert!(agg.is_sequential());
        assert_eq!(agg.get_index(1), Some(&BindValue::from("b")));
    }

    #[test]
    fn test_instance_declared_fields_start_null() {
        let instance = Instance::with_declared_fields("User", ["id", "name"]);

        assert_eq!(instance.len(), 2);
        assert_eq!(instance.get("id"), Some(&BindValue::Null));
        assert_eq!(instance.get("missing"), None);
    }

    #[test]
    fn test_instance_set_and_order() {
        let mut instance = Instance::with_declared_fields("User", ["id", "name"]);
        instance.set("name", BindValue::from("test"));

        let fields: Vec<&String> = instance.fields().map(|(k, _)| k).collect();
        assert_eq!(fields, ["id", "name"]);
        assert_eq!(instance.get("name"), Some(&BindValue::from("test")));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", BindValue::Integer(42)), "42");
        assert_eq!(format!("{}", BindValue::from("test")), "\"test\"");
        assert_eq!(format!("{}", BindValue::Null), "null");
    }
}
