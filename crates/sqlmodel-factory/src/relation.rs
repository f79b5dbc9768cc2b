//! Many-to-many relationship descriptors for pivot population.
//!
//! A `PivotRelation` describes one join table between a parent model and a
//! related model, optionally polymorphic. It mirrors the link-table metadata
//! the ORM keeps for `ManyToMany` relationships, plus the morph-type column
//! for polymorphic joins.

use crate::attribute::AttributeRow;
use crate::value::Value;

/// Reduce a possibly table-qualified column (`"post_tag.post_id"`) to its
/// bare name (`"post_id"`).
pub fn bare_column(column: &str) -> &str {
    column.rsplit('.').next().unwrap_or(column)
}

/// Type discriminator for a polymorphic join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphInfo {
    /// Column holding the type discriminator (e.g., `"taggable_type"`).
    pub type_column: String,
    /// Value written to `type_column` (e.g., `"posts"`).
    pub morph_class: String,
}

impl MorphInfo {
    /// Create a morph definition.
    pub fn new(type_column: impl Into<String>, morph_class: impl Into<String>) -> Self {
        Self {
            type_column: type_column.into(),
            morph_class: morph_class.into(),
        }
    }
}

/// A many-to-many relation between a parent model and a related model.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRelation {
    parent_model: String,
    related_model: String,
    table: String,
    parent_pivot_key: String,
    related_pivot_key: String,
    parent_key_name: String,
    morph: Option<MorphInfo>,
    bound_parent: Option<Value>,
}

impl PivotRelation {
    /// Create a plain many-to-many relation.
    ///
    /// # Example
    ///
    /// ```
    /// use sqlmodel_factory::PivotRelation;
    ///
    /// let rel = PivotRelation::new("posts", "tags", "post_tag", "post_tag.post_id", "tag_id");
    /// assert_eq!(rel.parent_pivot_key(), "post_id");
    /// ```
    pub fn new(
        parent_model: impl Into<String>,
        related_model: impl Into<String>,
        table: impl Into<String>,
        parent_pivot_key: impl Into<String>,
        related_pivot_key: impl Into<String>,
    ) -> Self {
        Self {
            parent_model: parent_model.into(),
            related_model: related_model.into(),
            table: table.into(),
            parent_pivot_key: parent_pivot_key.into(),
            related_pivot_key: related_pivot_key.into(),
            parent_key_name: "id".to_string(),
            morph: None,
            bound_parent: None,
        }
    }

    /// Mark the relation as polymorphic.
    #[must_use]
    pub fn morph(mut self, morph: MorphInfo) -> Self {
        self.morph = Some(morph);
        self
    }

    /// Set the parent's primary key column (defaults to `id`).
    #[must_use]
    pub fn parent_key_name(mut self, column: impl Into<String>) -> Self {
        self.parent_key_name = column.into();
        self
    }

    pub fn parent_model(&self) -> &str {
        &self.parent_model
    }

    pub fn related_model(&self) -> &str {
        &self.related_model
    }

    /// Join table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Bare name of the join column pointing at the parent.
    pub fn parent_pivot_key(&self) -> &str {
        bare_column(&self.parent_pivot_key)
    }

    /// Bare name of the join column pointing at the related model.
    pub fn related_pivot_key(&self) -> &str {
        bare_column(&self.related_pivot_key)
    }

    /// Primary key column on the parent model.
    pub fn parent_key(&self) -> &str {
        &self.parent_key_name
    }

    pub fn morph_info(&self) -> Option<&MorphInfo> {
        self.morph.as_ref()
    }

    pub fn is_polymorphic(&self) -> bool {
        self.morph.is_some()
    }

    /// Columns the relation sets itself and extra attributes must never touch.
    pub fn reserved_columns(&self) -> Vec<&str> {
        let mut columns = vec![self.parent_pivot_key(), self.related_pivot_key()];
        if let Some(morph) = &self.morph {
            columns.push(bare_column(&morph.type_column));
        }
        columns
    }

    /// Bind the relation to a parent key, replacing any previous binding.
    pub fn bind_parent(&mut self, key: Value) -> &Value {
        self.bound_parent.insert(key)
    }

    /// The parent key from the most recent `bind_parent`.
    pub fn bound_parent(&self) -> Option<&Value> {
        self.bound_parent.as_ref()
    }

    /// Build a complete join row: both foreign keys, the morph type when
    /// polymorphic, and the given extra columns.
    pub fn link_row(
        &self,
        parent_key: &Value,
        related_key: &Value,
        extra: &AttributeRow,
    ) -> AttributeRow {
        let mut row = extra.clone();
        row.insert(self.parent_pivot_key().to_string(), parent_key.clone());
        row.insert(self.related_pivot_key().to_string(), related_key.clone());
        if let Some(morph) = &self.morph {
            row.insert(
                bare_column(&morph.type_column).to_string(),
                Value::Text(morph.morph_class.clone()),
            );
        }
        row
    }
}
