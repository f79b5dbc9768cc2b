//! Catalog of primary keys inserted during a seeding run.

use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;

/// Primary keys persisted so far, grouped by model name.
///
/// The orchestrator records keys as it inserts records; pivot population
/// only reads from the catalog.
#[derive(Debug, Clone, Default)]
pub struct InsertedKeys {
    keys: HashMap<String, Vec<Value>>,
}

impl InsertedKeys {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `model` has an entry, even if no keys were inserted.
    pub fn ensure(&mut self, model: impl Into<String>) -> &mut Self {
        self.keys.entry(model.into()).or_default();
        self
    }

    /// Record one inserted key for `model`.
    pub fn record(&mut self, model: impl Into<String>, key: impl Into<Value>) -> &mut Self {
        self.keys.entry(model.into()).or_default().push(key.into());
        self
    }

    /// Record several inserted keys for `model`, preserving order.
    pub fn extend<I, V>(&mut self, model: impl Into<String>, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.keys
            .entry(model.into())
            .or_default()
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Keys for `model`, or `None` if it was never recorded.
    pub fn get(&self, model: &str) -> Option<&[Value]> {
        self.keys.get(model).map(Vec::as_slice)
    }

    /// Keys for `model`, failing if the model has no entry.
    pub fn keys_for(&self, model: &str) -> Result<&[Value]> {
        self.get(model).ok_or_else(|| Error::MissingKeys {
            model: model.to_string(),
        })
    }

    /// Check whether `model` has an entry.
    pub fn contains(&self, model: &str) -> bool {
        self.keys.contains_key(model)
    }

    /// Number of models in the catalog.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the catalog has no models.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
