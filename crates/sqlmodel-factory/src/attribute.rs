//! Extra pivot attributes: literal values or values computed per parent.

use crate::catalog::InsertedKeys;
use crate::error::Result;
use crate::record::Record;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a computed attribute: `(parent, every inserted key) -> value`.
pub type ComputeFn = dyn Fn(&Record, &InsertedKeys) -> Result<Value> + Send + Sync;

/// The value source for one pivot column.
#[derive(Clone)]
pub enum AttributeValue {
    /// Use this value for every row.
    Literal(Value),
    /// Evaluate per row against the current parent and the key catalog.
    Computed(Arc<ComputeFn>),
}

impl AttributeValue {
    /// Use the same value for every row.
    pub fn literal(value: impl Into<Value>) -> Self {
        AttributeValue::Literal(value.into())
    }

    /// Wrap a closure as a computed attribute.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Record, &InsertedKeys) -> Result<Value> + Send + Sync + 'static,
    {
        AttributeValue::Computed(Arc::new(f))
    }

    /// Check if this attribute is evaluated per row.
    pub fn is_computed(&self) -> bool {
        matches!(self, AttributeValue::Computed(_))
    }

    /// Resolve to a concrete value for `parent`.
    pub fn evaluate(&self, parent: &Record, inserted: &InsertedKeys) -> Result<Value> {
        match self {
            AttributeValue::Literal(value) => Ok(value.clone()),
            AttributeValue::Computed(f) => f(parent, inserted),
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            AttributeValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        AttributeValue::Literal(value)
    }
}

/// Pivot column name to value source.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Evaluated pivot columns for one row.
pub type AttributeRow = BTreeMap<String, Value>;

/// Evaluate every attribute for `parent`.
///
/// Each column is evaluated independently; the first failure aborts the row.
pub fn evaluate_all(
    attributes: &Attributes,
    parent: &Record,
    inserted: &InsertedKeys,
) -> Result<AttributeRow> {
    if attributes.is_empty() {
        return Ok(AttributeRow::new());
    }
    attributes
        .iter()
        .map(|(column, source)| Ok((column.clone(), source.evaluate(parent, inserted)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_literal_is_cloned() {
        let parent = Record::new("posts").with("id", 1_i64);
        let attr = AttributeValue::literal("pinned");
        assert!(!attr.is_computed());
        assert_eq!(
            attr.evaluate(&parent, &InsertedKeys::new()).unwrap(),
            Value::Text("pinned".to_string())
        );
    }

    #[test]
    fn test_computed_sees_parent_and_whole_catalog() {
        let parent = Record::new("posts").with("id", 7_i64);
        let mut inserted = InsertedKeys::new();
        inserted.extend("users", [10_i64, 11, 12]);

        let attr = AttributeValue::computed(|parent, inserted| {
            let users = inserted.keys_for("users")?.len() as i64;
            let id = parent.primary_key_value().as_i64().unwrap_or(0);
            Ok(Value::BigInt(id * 100 + users))
        });
        assert_eq!(
            attr.evaluate(&parent, &inserted).unwrap(),
            Value::BigInt(703)
        );
    }

    #[test]
    fn test_evaluate_all_propagates_failure() {
        let parent = Record::new("posts").with("id", 1_i64);
        let mut attrs = Attributes::new();
        attrs.insert("note".to_string(), AttributeValue::literal("ok"));
        attrs.insert(
            "weight".to_string(),
            AttributeValue::computed(|_, _| Err(Error::attribute("weight", "no weights left"))),
        );

        let err = evaluate_all(&attrs, &parent, &InsertedKeys::new()).unwrap_err();
        assert!(matches!(err, Error::Attribute(ref e) if e.column == "weight"));
    }

    #[test]
    fn test_evaluate_all_empty_fast_path() {
        let parent = Record::new("posts");
        let row = evaluate_all(&Attributes::new(), &parent, &InsertedKeys::new()).unwrap();
        assert!(row.is_empty());
    }
}
