//! Error types for pivot population.

use std::fmt;

/// The primary error type for factory operations.
#[derive(Debug)]
pub enum Error {
    /// The inserted-key catalog has no entry for a model
    MissingKeys {
        /// Model whose keys were requested
        model: String,
    },
    /// More associations were requested than keys are available
    InsufficientKeys {
        /// Related model being sampled
        model: String,
        /// Number of keys requested
        requested: usize,
        /// Number of keys in the catalog
        available: usize,
    },
    /// The parent record has no value in the relation's parent key column
    MissingParentKey {
        /// Parent model
        model: String,
        /// Primary key column the relation reads
        column: String,
    },
    /// The parent record belongs to a different model than the relation
    ParentModelMismatch {
        /// Parent model the relation was built for
        expected: String,
        /// Model of the record that was passed in
        actual: String,
    },
    /// A computed pivot attribute failed
    Attribute(AttributeError),
    /// The pivot writer failed to persist rows
    Persistence(PersistenceError),
    /// Configuration errors
    Config(ConfigError),
}

#[derive(Debug)]
pub struct AttributeError {
    pub column: String,
    pub message: String,
}

#[derive(Debug)]
pub struct PersistenceError {
    pub kind: PersistenceErrorKind,
    pub table: String,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceErrorKind {
    /// Constraint violation (unique, foreign key, etc.)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Other database error
    Database,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Build an attribute error for `column`.
    pub fn attribute(column: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Attribute(AttributeError {
            column: column.into(),
            message: message.into(),
        })
    }

    /// Build a persistence error for `table`.
    pub fn persistence(
        kind: PersistenceErrorKind,
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Persistence(PersistenceError {
            kind,
            table: table.into(),
            message: message.into(),
            source: None,
        })
    }

    /// Is this a constraint violation reported by the writer?
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Persistence(PersistenceError {
                kind: PersistenceErrorKind::Constraint,
                ..
            })
        )
    }

    /// Does this error point at orchestration order (a model seeded too late)?
    pub fn is_sequencing_error(&self) -> bool {
        matches!(self, Error::MissingKeys { .. })
    }

    /// Was the wrong or an incomplete parent record passed in?
    pub fn is_parent_error(&self) -> bool {
        matches!(
            self,
            Error::MissingParentKey { .. } | Error::ParentModelMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingKeys { model } => write!(
                f,
                "No inserted keys recorded for model '{}'; seed it before its pivots",
                model
            ),
            Error::InsufficientKeys {
                model,
                requested,
                available,
            } => write!(
                f,
                "Cannot associate {} '{}' records: only {} available",
                requested, model, available
            ),
            Error::MissingParentKey { model, column } => write!(
                f,
                "Parent '{}' record has no value in key column '{}'",
                model, column
            ),
            Error::ParentModelMismatch { expected, actual } => write!(
                f,
                "Relation expects '{}' parents, got a '{}' record",
                expected, actual
            ),
            Error::Attribute(e) => write!(f, "Attribute error: {}", e),
            Error::Persistence(e) => write!(f, "Persistence error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Persistence(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column '{}': {}", self.column, self.message)
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (table '{}')", self.message, self.table)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<AttributeError> for Error {
    fn from(err: AttributeError) -> Self {
        Error::Attribute(err)
    }
}

impl From<PersistenceError> for Error {
    fn from(err: PersistenceError) -> Self {
        Error::Persistence(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for factory operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_keys_message_names_counts() {
        let err = Error::InsufficientKeys {
            model: "tags".to_string(),
            requested: 9,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Cannot associate 9 'tags' records: only 5 available"
        );
    }

    #[test]
    fn test_classification_helpers() {
        let constraint = Error::persistence(
            PersistenceErrorKind::Constraint,
            "post_tag",
            "duplicate link",
        );
        assert!(constraint.is_constraint_violation());
        assert!(!constraint.is_sequencing_error());

        let missing = Error::MissingKeys {
            model: "tags".to_string(),
        };
        assert!(missing.is_sequencing_error());
        assert!(!missing.is_constraint_violation());

        let no_key = Error::MissingParentKey {
            model: "posts".to_string(),
            column: "uuid".to_string(),
        };
        assert!(no_key.is_parent_error());
        assert_eq!(
            no_key.to_string(),
            "Parent 'posts' record has no value in key column 'uuid'"
        );
        assert!(!missing.is_parent_error());
    }

    #[test]
    fn test_source_is_exposed_for_persistence() {
        let err = Error::Persistence(PersistenceError {
            kind: PersistenceErrorKind::Database,
            table: "post_tag".to_string(),
            message: "write failed".to_string(),
            source: Some(Box::new(std::io::Error::other("disk full"))),
        });
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk full"));
    }
}
