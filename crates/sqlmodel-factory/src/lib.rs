//! Test-fixture generation for SQLModel Rust: many-to-many pivot population.
//!
//! Once both sides of a many-to-many relationship have been seeded, a
//! [`PivotAssociator`] fills the join table with random links:
//!
//! - [`PivotRelation`] describes the join table, optionally polymorphic
//! - [`InsertedKeys`] holds the primary keys seeded so far, per model
//! - [`Attributes`] supply extra pivot columns, literal or computed
//! - [`PivotWriter`] persists links immediately, or
//!   [`PivotAssociator::insert_records`] plus [`PivotBatch`] buffer them for
//!   one bulk insert
//!
//! # Example
//!
//! ```
//! use sqlmodel_factory::prelude::*;
//!
//! let relation = PivotRelation::new("posts", "tags", "post_tag", "post_id", "tag_id");
//! let config = SeedConfig::new().seed(7);
//! let mut posts_tags =
//!     PivotAssociator::new(relation, config.clone(), config.rng(), Attributes::new())
//!         .with_quantity(2);
//!
//! let mut inserted = InsertedKeys::new();
//! inserted.extend("tags", [1_i64, 2, 3, 4, 5]);
//!
//! let post = Record::new("posts").with("id", 10_i64);
//! let records = posts_tags.insert_records(&post, &inserted).unwrap();
//! assert_eq!(records.rows.len(), 2);
//! assert_eq!(records.parent_key_column, "post_id");
//! ```

pub mod attribute;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pivot;
pub mod random;
pub mod record;
pub mod relation;
pub mod value;
pub mod writer;

pub use attribute::{AttributeRow, AttributeValue, Attributes, ComputeFn, evaluate_all};
pub use batch::{PivotBatch, PivotGroupKey, PivotInsertBatch};
pub use catalog::InsertedKeys;
pub use config::{DETERMINISTIC_ENV, ParentBuilder, SEED_ENV, SeedConfig};
pub use error::{
    AttributeError, ConfigError, Error, PersistenceError, PersistenceErrorKind, Result,
};
pub use pivot::{PivotAssociator, PivotInsertRecords};
pub use random::{SeedRng, StdSeedRng};
pub use record::Record;
pub use relation::{MorphInfo, PivotRelation, bare_column};
pub use value::Value;
pub use writer::{PivotAttachment, PivotWriter};

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        AttributeValue, Attributes, Error, InsertedKeys, MorphInfo, ParentBuilder, PivotAssociator,
        PivotAttachment, PivotBatch, PivotInsertRecords, PivotRelation, PivotWriter, Record,
        Result, SeedConfig, SeedRng, StdSeedRng, Value,
    };
}
