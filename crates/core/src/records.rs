//! The opaque record type served by the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One domain entity (an election, a candidate, a voter entry) as a map of
/// field name to value. Fields are not fixed at the schema level; they are
/// whatever the underlying file declares, plus computed fields attached by
/// the parser (`status`, `key`, rendered Markdown).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of `field`, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Insert or replace `field`.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// The record's primary key (the computed `key` field).
    pub fn key(&self) -> Option<&str> {
        self.get_str("key")
    }

    /// Exact-equality check against `field`. A record lacking the field is a
    /// non-match, never an error.
    pub fn matches(&self, field: &str, value: &Value) -> bool {
        self.0.get(field) == Some(value)
    }

    /// Iterate over `(field, value)` pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
