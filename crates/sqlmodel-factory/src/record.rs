//! Persisted records handed to pivot population.

use crate::value::Value;
use std::collections::BTreeMap;

/// A record that has already been written during the seeding run.
///
/// The factory only needs the model name, the primary key, and whatever
/// columns computed attributes want to read, so records are kept as a
/// plain column map rather than a typed `Model`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: String,
    primary_key: String,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record for `model` keyed by the `id` column.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            primary_key: "id".to_string(),
            values: BTreeMap::new(),
        }
    }

    /// Use a primary key column other than `id`.
    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Set a column value.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Model name this record belongs to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Name of the primary key column.
    pub fn primary_key_name(&self) -> &str {
        &self.primary_key
    }

    /// Value of the primary key, or `Value::Null` if it was never set.
    pub fn primary_key_value(&self) -> Value {
        self.values
            .get(&self.primary_key)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_defaults_to_id() {
        let post = Record::new("posts").with("id", 3_i64);
        assert_eq!(post.primary_key_name(), "id");
        assert_eq!(post.primary_key_value(), Value::BigInt(3));
    }

    #[test]
    fn test_custom_primary_key_and_missing_value() {
        let post = Record::new("posts").primary_key("uuid").with("title", "hi");
        assert_eq!(post.primary_key_name(), "uuid");
        assert!(post.primary_key_value().is_null());
        assert_eq!(post.get("title"), Some(&Value::Text("hi".to_string())));
    }
}
