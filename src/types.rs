//! Core types for the tracked collection.

use crate::error::{CollectionError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{Deref, Index};
use std::sync::Arc;

/// A single record in the collection.
///
/// Records are immutable, reference-counted field maps. Cloning a record
/// shares the same allocation, so a clone is *identity-equal* to its source.
/// `PartialEq` compares field contents; change detection uses
/// [`Record::ptr_eq`] instead.
#[derive(Clone)]
pub struct Record(Arc<Map<String, Value>>);

impl Record {
    /// Create a record from a field map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Record(Arc::new(fields))
    }

    /// Create a record with no fields.
    pub fn empty() -> Self {
        Record::new(Map::new())
    }

    /// Create a record from a JSON value. The value must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Record::new(fields)),
            other => Err(CollectionError::NotAnObject(value_kind(&other).to_string())),
        }
    }

    /// Create a record from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        Record::from_value(serde_json::to_value(value)?)
    }

    /// Decode the record into a caller-defined type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(Value::Object(self.fields().clone()))
            .map_err(|e| CollectionError::Deserialization(e.to_string()))
    }

    /// Get a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// All fields of this record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a new record equal to this one with `field` set to `value`.
    ///
    /// Other fields are carried over unchanged. `self` is left untouched and
    /// the returned record never shares identity with it.
    pub fn with_field(&self, field: impl Into<String>, value: Value) -> Record {
        let mut fields = (*self.0).clone();
        fields.insert(field.into(), value);
        Record::new(fields)
    }

    /// Identity comparison: true only if both handles point at the same record.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Convert to a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields().clone())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// Missing fields read as `null`.
    fn index(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.get(field).unwrap_or(&NULL)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Record::new(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = CollectionError;

    fn try_from(value: Value) -> Result<Self> {
        Record::from_value(value)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Record::new)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An immutable, shared ordered sequence of records.
///
/// Every mutating operation produces a new `Items`; an installed sequence
/// is never written to. Cloning is cheap and keeps identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Items(Arc<[Record]>);

impl Items {
    /// An empty sequence.
    pub fn empty() -> Self {
        Items(Arc::from(Vec::new()))
    }

    /// Identity comparison of the sequences themselves (not their records).
    pub fn ptr_eq(&self, other: &Items) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy the record handles into an owned vector. Records keep identity.
    pub fn to_vec(&self) -> Vec<Record> {
        self.0.to_vec()
    }
}

impl Default for Items {
    fn default() -> Self {
        Items::empty()
    }
}

impl Deref for Items {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.0
    }
}

impl From<Vec<Record>> for Items {
    fn from(records: Vec<Record>) -> Self {
        Items(Arc::from(records))
    }
}

impl FromIterator<Record> for Items {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Items(iter.into_iter().collect())
    }
}

impl fmt::Debug for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Serialize for Items {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<Record>::deserialize(deserializer).map(Items::from)
    }
}

/// Counter of installed sequences. Bumped once per successful operation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_field_is_shallow_merge() {
        let original = Record::from_value(json!({"n": "o1", "v": "o1"})).unwrap();
        let updated = original.with_field("v", json!("new"));

        assert_eq!(updated.get("n"), Some(&json!("o1")));
        assert_eq!(updated.get("v"), Some(&json!("new")));
        // Original untouched
        assert_eq!(original.get("v"), Some(&json!("o1")));
        assert!(!updated.ptr_eq(&original));
    }

    #[test]
    fn test_identity_vs_content() {
        let a = Record::from_value(json!({"name": "a"})).unwrap();
        let b = Record::from_value(json!({"name": "a"})).unwrap();
        let a2 = a.clone();

        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a2));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let result = Record::from_value(json!([1, 2, 3]));
        assert!(matches!(result, Err(CollectionError::NotAnObject(kind)) if kind == "array"));
    }

    #[test]
    fn test_typed_roundtrip() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Row {
            name: String,
            count: u32,
        }

        let row = Row {
            name: "foo".to_string(),
            count: 3,
        };
        let record = Record::from_serialize(&row).unwrap();
        assert_eq!(record.get("count"), Some(&json!(3)));
        assert_eq!(record.decode::<Row>().unwrap(), row);
    }

    #[test]
    fn test_items_clone_keeps_identity() {
        let items: Items = vec![Record::empty(), Record::empty()].into();
        let copy = items.clone();
        assert!(items.ptr_eq(&copy));
        assert!(items[0].ptr_eq(&copy[0]));

        let rebuilt = Items::from(items.to_vec());
        assert!(!items.ptr_eq(&rebuilt));
        assert!(items[1].ptr_eq(&rebuilt[1]));
    }
}
