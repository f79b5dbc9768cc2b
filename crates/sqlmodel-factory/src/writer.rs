//! Persistence seam for immediate pivot association.

use crate::attribute::AttributeRow;
use crate::error::Result;
use crate::relation::PivotRelation;
use crate::value::Value;

/// One related record to link, with its extra pivot columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotAttachment {
    /// Primary key of the related record.
    pub related_key: Value,
    /// Extra pivot columns (never foreign keys or the morph type).
    pub attributes: AttributeRow,
}

impl PivotAttachment {
    pub fn new(related_key: Value, attributes: AttributeRow) -> Self {
        Self {
            related_key,
            attributes,
        }
    }
}

/// Writes join rows for a relation.
///
/// Implementations set both foreign keys and, for polymorphic relations,
/// the morph type themselves; `PivotRelation::link_row` builds that row.
/// Errors are returned to the caller unchanged and are not retried.
pub trait PivotWriter {
    fn attach(
        &mut self,
        relation: &PivotRelation,
        parent_key: &Value,
        attachments: &[PivotAttachment],
    ) -> Result<()>;
}

impl<W: PivotWriter + ?Sized> PivotWriter for &mut W {
    fn attach(
        &mut self,
        relation: &PivotRelation,
        parent_key: &Value,
        attachments: &[PivotAttachment],
    ) -> Result<()> {
        (**self).attach(relation, parent_key, attachments)
    }
}
