use serde::Serialize;

use crate::core::{StorageType, StoreError, Value};
use crate::result::ResultSet;

/// A named parameter value taken from an entity field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundValue {
    pub column: String,
    pub value: Value,
    pub storage: StorageType,
}

impl BoundValue {
    pub fn new(column: impl Into<String>, value: Value, storage: StorageType) -> Self {
        Self {
            column: column.into(),
            value,
            storage,
        }
    }

    /// Placeholder name as it appears in generated SQL.
    pub fn placeholder(&self) -> String {
        format!(":{}", self.column)
    }
}

/// Store connection trait - lets the mapper run against pluggable backends.
///
/// Connections are owned by the caller and are expected to be used by one
/// writer at a time; the mapper takes them by `&mut` and never locks.
pub trait StoreConnection {
    /// Execute a statement that modifies data and return the affected row count.
    fn execute(&mut self, sql: &str, params: &[BoundValue]) -> Result<usize, StoreError>;

    /// Execute a statement that returns rows, fully materialized.
    fn query(&mut self, sql: &str, params: &[BoundValue]) -> Result<ResultSet, StoreError>;
}

impl<C: StoreConnection + ?Sized> StoreConnection for &mut C {
    fn execute(&mut self, sql: &str, params: &[BoundValue]) -> Result<usize, StoreError> {
        (**self).execute(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[BoundValue]) -> Result<ResultSet, StoreError> {
        (**self).query(sql, params)
    }
}
