use std::fmt;

use thiserror::Error;

/// Structural problems with an entity's table metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Type '{0}' has no table name")]
    MissingTableName(String),

    #[error("Type '{0}' declares no columns")]
    NoColumns(String),

    #[error("Type '{0}' declares no key column")]
    NoKeyColumn(String),

    #[error("Type '{type_name}' declares {count} key columns, expected exactly one")]
    MultipleKeyColumns { type_name: String, count: usize },

    #[error("Column '{column}' has no field accessor")]
    MissingAccessor { column: String },

    #[error("Column '{column}' is declared more than once")]
    DuplicateColumn { column: String },

    #[error("'{0}' is not a valid SQL identifier")]
    InvalidIdentifier(String),
}

/// A store value that does not fit the target field type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert {found} into {expected}")]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: String,
}

impl ConversionError {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

/// Errors raised by a store connection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that abort a mapping operation.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Entity type declares no key column")]
    NoKeyColumn,

    #[error("Entity type has no table metadata")]
    NoTableMetadata,

    #[error("Table '{0}' has no writable columns to update")]
    NothingToUpdate(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}': {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConversionError,
    },

    #[error("Metadata error: {0}")]
    Metadata(MetadataError),

    #[error("Execution error: {0}")]
    Execution(#[from] StoreError),
}

impl From<MetadataError> for MappingError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::MissingTableName(_) => Self::NoTableMetadata,
            MetadataError::NoKeyColumn(_) => Self::NoKeyColumn,
            other => Self::Metadata(other),
        }
    }
}

/// A statement the store rejected during Save or Delete.
///
/// This is reported, not raised: see [`ExecOutcome`](crate::mapper::ExecOutcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    pub sql: String,
    pub message: String,
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' failed: {}", self.sql, self.message)
    }
}

/// A single column left untouched while hydrating a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationSkip {
    pub column: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingColumn,
    Conversion(ConversionError),
}

impl fmt::Display for HydrationSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::MissingColumn => {
                write!(f, "column '{}' is missing from the row", self.column)
            }
            SkipReason::Conversion(err) => write!(f, "column '{}': {}", self.column, err),
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_errors_map_to_mapping_errors() {
        assert!(matches!(
            MappingError::from(MetadataError::MissingTableName("Person".into())),
            MappingError::NoTableMetadata
        ));
        assert!(matches!(
            MappingError::from(MetadataError::NoKeyColumn("Person".into())),
            MappingError::NoKeyColumn
        ));
        assert!(matches!(
            MappingError::from(MetadataError::DuplicateColumn { column: "id".into() }),
            MappingError::Metadata(MetadataError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_skip_display() {
        let skip = HydrationSkip {
            column: "age".into(),
            reason: SkipReason::Conversion(ConversionError::new("INTEGER", "TEXT")),
        };
        assert_eq!(skip.to_string(), "column 'age': Cannot convert TEXT into INTEGER");
    }
}
