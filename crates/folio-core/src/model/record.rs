use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name carrying a record's identity
pub const ID_FIELD: &str = "id";

/// Canonical textual form of a record identifier
///
/// Ids are stored either as JSON integers (`7`) or as digit strings
/// (`"1718000000000"`). Lookups compare the textual form so that a path
/// segment `"7"` matches a stored integer `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id from a stored JSON value.
    ///
    /// Integers and non-blank strings are ids; anything else is not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .map(|v| v.to_string())
                .or_else(|| n.as_i64().map(|v| v.to_string()))
                .map(Self),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is an unsigned integer
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One entity instance in a collection
///
/// A record is an open-ended JSON object; only `id` has meaning to the
/// store. Field schemas are enforced by `rules::schema` before a record
/// reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Interpret a stored JSON value as a record. Non-objects are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn id(&self) -> Option<RecordId> {
        self.0.get(ID_FIELD).and_then(RecordId::from_value)
    }

    /// True when this record's id matches `id` textually
    pub fn has_id(&self, id: &RecordId) -> bool {
        self.id().as_ref() == Some(id)
    }

    pub fn set_id(&mut self, id: Value) {
        self.0.insert(ID_FIELD.to_string(), id);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// String value of a field, if present and a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Copy every field of `other` onto this record, overwriting
    pub fn merge(&mut self, other: Record) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_compare_textually() {
        let numeric = Record::from_value(json!({"id": 7, "title": "A"})).unwrap();
        let textual = Record::from_value(json!({"id": "7", "title": "B"})).unwrap();
        assert_eq!(numeric.id(), textual.id());
        assert!(numeric.has_id(&RecordId::from("7")));
    }

    #[test]
    fn test_non_object_is_not_a_record() {
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("x")).is_none());
    }

    #[test]
    fn test_blank_or_missing_id() {
        let blank = Record::from_value(json!({"id": "  "})).unwrap();
        assert!(blank.id().is_none());
        let missing = Record::from_value(json!({"title": "x"})).unwrap();
        assert!(missing.id().is_none());
        let float = Record::from_value(json!({"id": 1.5})).unwrap();
        assert!(float.id().is_none());
    }

    #[test]
    fn test_merge_overwrites_fields() {
        let mut base = Record::from_value(json!({"id": 1, "title": "old", "company": "X"})).unwrap();
        base.merge(Record::from_value(json!({"title": "new"})).unwrap());
        assert_eq!(base.get_str("title"), Some("new"));
        assert_eq!(base.get_str("company"), Some("X"));
    }
}
