//! Pivot population for many-to-many relationships.
//!
//! A `PivotAssociator` is built once per relation and invoked once per
//! parent record. For each parent it decides how many related records to
//! link, samples that many distinct keys from the inserted-key catalog,
//! evaluates the extra pivot columns, and then either hands the links to a
//! [`PivotWriter`] or returns raw rows for a later bulk insert.
//!
//! Quantity policy:
//! - a fixed quantity always wins
//! - deterministic mode links every available key
//! - otherwise a uniform count in `0..=available`
//!
//! The two paths sample independently; calling both for the same parent
//! can link different keys.

use crate::attribute::{AttributeRow, Attributes, evaluate_all};
use crate::catalog::InsertedKeys;
use crate::config::ParentBuilder;
use crate::error::{Error, Result};
use crate::random::SeedRng;
use crate::record::Record;
use crate::relation::{PivotRelation, bare_column};
use crate::value::Value;
use crate::writer::{PivotAttachment, PivotWriter};

/// Join rows for one parent, ready to be buffered for a bulk insert.
///
/// The parent foreign key is deliberately absent from `rows`; the caller
/// stamps it in once the parent key is settled (see `PivotBatch`).
#[derive(Debug, Clone, PartialEq)]
pub struct PivotInsertRecords {
    /// Related model, which tells apart inverse polymorphic relations
    /// sharing one join table.
    pub related_model: String,
    /// Join table name.
    pub table: String,
    /// One row per sampled related key.
    pub rows: Vec<AttributeRow>,
    /// Bare join column the caller fills with the parent key.
    pub parent_key_column: String,
}

/// Populates one relation's join table, one parent at a time.
pub struct PivotAssociator<B, R> {
    relation: PivotRelation,
    builder: B,
    rng: R,
    related_model: String,
    guessed: Attributes,
    custom: Attributes,
    quantity: Option<usize>,
}

impl<B: ParentBuilder, R: SeedRng> PivotAssociator<B, R> {
    /// Create an associator for `relation`.
    ///
    /// `guessed` are the formatters inferred for the join table's columns.
    /// The relation's foreign key columns, and its morph type column when
    /// polymorphic, are dropped from them.
    pub fn new(relation: PivotRelation, builder: B, rng: R, guessed: Attributes) -> Self {
        let related_model = relation.related_model().to_string();
        let guessed = strip_reserved(&relation, guessed);
        Self {
            relation,
            builder,
            rng,
            related_model,
            guessed,
            custom: Attributes::new(),
            quantity: None,
        }
    }

    /// Link exactly `quantity` related records per parent.
    pub fn set_quantity(&mut self, quantity: usize) -> &mut Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.set_quantity(quantity);
        self
    }

    /// Supply pivot columns that override guessed formatters.
    pub fn set_custom_attributes(&mut self, attributes: Attributes) -> &mut Self {
        self.custom = strip_reserved(&self.relation, attributes);
        self
    }

    #[must_use]
    pub fn with_custom_attributes(mut self, attributes: Attributes) -> Self {
        self.set_custom_attributes(attributes);
        self
    }

    pub fn quantity(&self) -> Option<usize> {
        self.quantity
    }

    pub fn relation(&self) -> &PivotRelation {
        &self.relation
    }

    pub fn related_model(&self) -> &str {
        &self.related_model
    }

    /// Guessed formatters merged with custom attributes; custom wins.
    pub fn extra_formatters(&self) -> Attributes {
        let mut merged = self.guessed.clone();
        merged.extend(
            self.custom
                .iter()
                .map(|(column, source)| (column.clone(), source.clone())),
        );
        merged
    }

    /// Link `parent` to a sample of related records through `writer`.
    ///
    /// The parent key is read from the relation's `parent_key` column, not
    /// from the record's own primary key setting. A parent of another model,
    /// or one with no value in that column, fails before anything is sampled.
    ///
    /// Returns the number of links handed to the writer.
    #[tracing::instrument(
        level = "debug",
        skip(self, parent, inserted, writer),
        fields(table = %self.relation.table(), related = %self.related_model)
    )]
    pub fn execute<W: PivotWriter>(
        &mut self,
        parent: &Record,
        inserted: &InsertedKeys,
        writer: &mut W,
    ) -> Result<usize> {
        self.check_parent_model(parent)?;
        let parent_key = self.parent_key_of(parent)?;
        let parent_key = self.relation.bind_parent(parent_key).clone();
        let related_keys = self.sample_related(inserted)?;

        let formatters = self.extra_formatters();
        let attachments = related_keys
            .into_iter()
            .map(|key| {
                let attributes = evaluate_all(&formatters, parent, inserted)?;
                Ok(PivotAttachment::new(key, attributes))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            parent = %parent_key,
            count = attachments.len(),
            "Attaching pivot rows"
        );
        writer.attach(&self.relation, &parent_key, &attachments)?;
        Ok(attachments.len())
    }

    /// Build join rows for `parent` without writing them.
    #[tracing::instrument(
        level = "debug",
        skip(self, parent, inserted),
        fields(table = %self.relation.table(), related = %self.related_model)
    )]
    pub fn insert_records(
        &mut self,
        parent: &Record,
        inserted: &InsertedKeys,
    ) -> Result<PivotInsertRecords> {
        self.check_parent_model(parent)?;
        let related_key_column = self.relation.related_pivot_key().to_string();
        let morph = self.relation.morph_info().map(|morph| {
            (
                bare_column(&morph.type_column).to_string(),
                Value::Text(morph.morph_class.clone()),
            )
        });

        let related_keys = self.sample_related(inserted)?;
        let formatters = self.extra_formatters();
        let rows = related_keys
            .into_iter()
            .map(|key| {
                let mut row = evaluate_all(&formatters, parent, inserted)?;
                row.insert(related_key_column.clone(), key);
                if let Some((column, class)) = &morph {
                    row.insert(column.clone(), class.clone());
                }
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PivotInsertRecords {
            related_model: self.related_model.clone(),
            table: self.relation.table().to_string(),
            rows,
            parent_key_column: self.relation.parent_pivot_key().to_string(),
        })
    }

    fn check_parent_model(&self, parent: &Record) -> Result<()> {
        if parent.model() == self.relation.parent_model() {
            return Ok(());
        }
        Err(Error::ParentModelMismatch {
            expected: self.relation.parent_model().to_string(),
            actual: parent.model().to_string(),
        })
    }

    /// Read the parent key from the column the relation names.
    fn parent_key_of(&self, parent: &Record) -> Result<Value> {
        let column = self.relation.parent_key();
        match parent.get(column) {
            Some(key) if !key.is_null() => Ok(key.clone()),
            _ => {
                tracing::warn!(
                    model = parent.model(),
                    column,
                    "Parent record has no primary key value"
                );
                Err(Error::MissingParentKey {
                    model: parent.model().to_string(),
                    column: column.to_string(),
                })
            }
        }
    }

    fn association_quantity(&mut self, available: usize) -> usize {
        let quantity = if let Some(fixed) = self.quantity {
            fixed
        } else if self.builder.is_deterministic() {
            available
        } else {
            self.rng.uniform_int(0, available)
        };
        tracing::debug!(
            quantity,
            available,
            fixed = self.quantity.is_some(),
            "Chose pivot quantity"
        );
        quantity
    }

    fn sample_related(&mut self, inserted: &InsertedKeys) -> Result<Vec<Value>> {
        let available = inserted.keys_for(&self.related_model)?;
        let quantity = self.association_quantity(available.len());

        if quantity > available.len() {
            tracing::warn!(
                model = %self.related_model,
                requested = quantity,
                available = available.len(),
                "Pivot quantity exceeds inserted keys"
            );
            return Err(Error::InsufficientKeys {
                model: self.related_model.clone(),
                requested: quantity,
                available: available.len(),
            });
        }
        if quantity == 0 {
            return Ok(Vec::new());
        }

        Ok(self
            .rng
            .sample_indices(available.len(), quantity)
            .into_iter()
            .map(|i| available[i].clone())
            .collect())
    }
}

fn strip_reserved(relation: &PivotRelation, mut attributes: Attributes) -> Attributes {
    let reserved = relation.reserved_columns();
    attributes.retain(|column, _| {
        let keep = !reserved.contains(&bare_column(column));
        if !keep {
            tracing::debug!(
                column = %column,
                table = relation.table(),
                "Dropping reserved pivot column"
            );
        }
        keep
    });
    attributes
}
