//! Buffering of pivot rows for bulk insertion.
//!
//! Rows from many parents are grouped by related model, join table and
//! parent key column. Grouping on the related model matters for inverse
//! polymorphic relations: two of them can share one physical table while
//! needing separate row sets.

use crate::attribute::AttributeRow;
use crate::pivot::PivotInsertRecords;
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Identity of one buffered row set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PivotGroupKey {
    pub related_model: String,
    pub table: String,
    pub parent_key_column: String,
}

/// A multi-row INSERT for one join table.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotInsertBatch {
    /// Related model the rows link to.
    pub related_model: String,
    /// Join table name.
    pub table: String,
    /// Column list, sorted.
    pub columns: Vec<String>,
    /// Values per row, aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl PivotInsertBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accumulates join rows across parents until they are flushed.
#[derive(Debug, Clone, Default)]
pub struct PivotBatch {
    groups: BTreeMap<PivotGroupKey, Vec<AttributeRow>>,
}

impl PivotBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer `records` produced for the parent identified by `parent_key`.
    ///
    /// The parent key is written into each row's parent key column.
    pub fn push(&mut self, parent_key: &Value, records: PivotInsertRecords) {
        let PivotInsertRecords {
            related_model,
            table,
            rows,
            parent_key_column,
        } = records;

        let count = rows.len();
        let buffered = self
            .groups
            .entry(PivotGroupKey {
                related_model,
                table,
                parent_key_column: parent_key_column.clone(),
            })
            .or_default();
        buffered.extend(rows.into_iter().map(|mut row| {
            row.insert(parent_key_column.clone(), parent_key.clone());
            row
        }));
        tracing::trace!(parent = %parent_key, count, "Buffered pivot rows");
    }

    /// Buffered rows per group.
    pub fn groups(&self) -> impl Iterator<Item = (&PivotGroupKey, &[AttributeRow])> {
        self.groups.iter().map(|(key, rows)| (key, rows.as_slice()))
    }

    /// Total buffered rows across all groups.
    pub fn row_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Take every buffered group as a column-aligned insert batch.
    ///
    /// Cells missing from a row (a column only some rows carry) become
    /// `Value::Null`. Empty groups are skipped.
    pub fn drain(&mut self) -> Vec<PivotInsertBatch> {
        let groups = std::mem::take(&mut self.groups);
        let batches: Vec<_> = groups
            .into_iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(key, rows)| {
                let columns: Vec<String> = rows
                    .iter()
                    .flat_map(|row| row.keys().cloned())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let rows = rows
                    .into_iter()
                    .map(|mut row| {
                        columns
                            .iter()
                            .map(|column| row.remove(column).unwrap_or(Value::Null))
                            .collect()
                    })
                    .collect();
                PivotInsertBatch {
                    related_model: key.related_model,
                    table: key.table,
                    columns,
                    rows,
                }
            })
            .collect();
        tracing::debug!(batches = batches.len(), "Drained pivot batch");
        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(related: &str, table: &str, keys: &[i64]) -> PivotInsertRecords {
        PivotInsertRecords {
            related_model: related.to_string(),
            table: table.to_string(),
            rows: keys
                .iter()
                .map(|k| AttributeRow::from([("tag_id".to_string(), Value::BigInt(*k))]))
                .collect(),
            parent_key_column: "post_id".to_string(),
        }
    }

    #[test]
    fn test_push_stamps_parent_key() {
        let mut batch = PivotBatch::new();
        batch.push(&Value::BigInt(1), records("tags", "post_tag", &[4, 5]));
        batch.push(&Value::BigInt(2), records("tags", "post_tag", &[4]));

        assert_eq!(batch.row_count(), 3);
        let (key, rows) = batch.groups().next().unwrap();
        assert_eq!(key.table, "post_tag");
        assert_eq!(rows[2]["post_id"], Value::BigInt(2));
    }

    #[test]
    fn test_same_table_different_related_models_stay_apart() {
        let mut batch = PivotBatch::new();
        batch.push(&Value::BigInt(1), records("posts", "taggables", &[1]));
        batch.push(&Value::BigInt(1), records("videos", "taggables", &[2]));

        let drained = batch.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].related_model, "posts");
        assert_eq!(drained[1].related_model, "videos");
        assert!(drained.iter().all(|b| b.table == "taggables"));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_drain_aligns_columns_and_fills_nulls() {
        let mut batch = PivotBatch::new();
        let mut with_note = records("tags", "post_tag", &[7]);
        with_note.rows[0].insert("note".to_string(), Value::Text("hi".into()));
        batch.push(&Value::BigInt(1), with_note);
        batch.push(&Value::BigInt(2), records("tags", "post_tag", &[8]));

        let drained = batch.drain();
        assert_eq!(drained.len(), 1);
        let insert = &drained[0];
        assert_eq!(insert.columns, vec!["note", "post_id", "tag_id"]);
        assert_eq!(
            insert.rows,
            vec![
                vec![Value::Text("hi".into()), Value::BigInt(1), Value::BigInt(7)],
                vec![Value::Null, Value::BigInt(2), Value::BigInt(8)],
            ]
        );
    }

    #[test]
    fn test_drain_skips_empty_groups() {
        let mut batch = PivotBatch::new();
        batch.push(&Value::BigInt(1), records("tags", "post_tag", &[]));
        assert!(batch.is_empty());
        assert!(batch.drain().is_empty());
    }
}
