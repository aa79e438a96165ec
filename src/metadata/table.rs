use std::collections::HashSet;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::column::{ColumnDef, ColumnDescriptor, ColumnSchema};
use super::entity::Entity;
use crate::core::MetadataError;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
        .expect("identifier pattern is valid");
}

/// True if `name` can be used as a table or column name.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

fn check_identifier(name: &str) -> Result<(), MetadataError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(MetadataError::InvalidIdentifier(name.to_string()))
    }
}

/// Table name and ordered columns, without field accessors.
///
/// A `TableSchema` always has exactly one key column; SQL generation only
/// needs this part of the metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    table_name: String,
    columns: Vec<ColumnSchema>,
    key_index: usize,
}

impl TableSchema {
    /// Validates a column list.
    ///
    /// `type_name` only feeds error messages.
    pub fn build(
        type_name: &str,
        table_name: Option<&str>,
        columns: Vec<ColumnSchema>,
    ) -> Result<Self, MetadataError> {
        let table_name = table_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| MetadataError::MissingTableName(type_name.to_string()))?;
        check_identifier(table_name)?;

        if columns.is_empty() {
            return Err(MetadataError::NoColumns(type_name.to_string()));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            check_identifier(&column.name)?;
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(MetadataError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        let keys: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.is_key)
            .map(|(idx, _)| idx)
            .collect();
        let key_index = match keys.as_slice() {
            [] => return Err(MetadataError::NoKeyColumn(type_name.to_string())),
            [idx] => *idx,
            _ => {
                return Err(MetadataError::MultipleKeyColumns {
                    type_name: type_name.to_string(),
                    count: keys.len(),
                });
            }
        };

        Ok(Self {
            table_name: table_name.to_string(),
            columns,
            key_index,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn key(&self) -> &ColumnSchema {
        &self.columns[self.key_index]
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Columns that go into INSERT/UPDATE value lists, in declaration order.
    pub fn writable_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|column| column.is_writable())
    }
}

/// Immutable per-type metadata: the table schema plus field accessors.
pub struct TableDescriptor<T> {
    schema: TableSchema,
    columns: Vec<ColumnDescriptor<T>>,
}

impl<T: Entity> TableDescriptor<T> {
    /// Builds and validates the descriptor from `T`'s column definitions,
    /// bypassing the registry cache.
    pub fn build() -> Result<Self, MetadataError> {
        Self::from_defs(T::type_name(), T::table_name(), T::columns())
    }
}

impl<T> TableDescriptor<T> {
    pub fn from_defs(
        type_name: &str,
        table_name: Option<&str>,
        defs: Vec<ColumnDef<T>>,
    ) -> Result<Self, MetadataError> {
        let schema = TableSchema::build(
            type_name,
            table_name,
            defs.iter().map(|def| def.schema.clone()).collect(),
        )?;

        let columns = defs
            .into_iter()
            .map(|def| match (def.getter, def.setter) {
                (Some(getter), Some(setter)) => Ok(ColumnDescriptor::new(def.schema, getter, setter)),
                _ => Err(MetadataError::MissingAccessor {
                    column: def.schema.name,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { schema, columns })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    pub fn key(&self) -> &ColumnDescriptor<T> {
        &self.columns[self.schema.key_index()]
    }

    /// Looks a column up by its entity field name.
    pub fn column_by_field(&self, field: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|column| column.schema().field == field)
    }
}

impl<T> fmt::Debug for TableDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDescriptor")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StorageType, Value};

    fn key(name: &str) -> ColumnSchema {
        let mut column = ColumnSchema::new(name, StorageType::Integer);
        column.is_key = true;
        column
    }

    #[test]
    fn test_build_requires_exactly_one_key() {
        let text = ColumnSchema::new("name", StorageType::Text);

        let err = TableSchema::build("Person", Some("Person"), vec![text.clone()]).unwrap_err();
        assert_eq!(err, MetadataError::NoKeyColumn("Person".into()));

        let err = TableSchema::build("Person", Some("Person"), vec![key("a"), key("b"), text.clone()])
            .unwrap_err();
        assert!(matches!(err, MetadataError::MultipleKeyColumns { count: 2, .. }));

        let schema = TableSchema::build("Person", Some("Person"), vec![text, key("id")]).unwrap();
        assert_eq!(schema.key().name, "id");
        assert_eq!(schema.key_index(), 1);
    }

    #[test]
    fn test_build_rejects_bad_names() {
        let err = TableSchema::build("Person", None, vec![key("id")]).unwrap_err();
        assert_eq!(err, MetadataError::MissingTableName("Person".into()));

        let err = TableSchema::build("Person", Some("Person; DROP"), vec![key("id")]).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidIdentifier(_)));

        let err = TableSchema::build("Person", Some("Person"), vec![key("id"), key("ID")]).unwrap_err();
        assert!(matches!(err, MetadataError::DuplicateColumn { .. }));

        let err = TableSchema::build("Person", Some("Person"), Vec::new()).unwrap_err();
        assert_eq!(err, MetadataError::NoColumns("Person".into()));
    }

    #[derive(Default)]
    struct Tag {
        id: i64,
    }

    #[test]
    fn test_missing_accessor() {
        let defs = vec![ColumnDef::<Tag>::new("id", StorageType::Integer)
            .key()
            .getter(|tag| Value::Integer(tag.id))];
        let err = TableDescriptor::from_defs("Tag", Some("Tag"), defs).unwrap_err();
        assert_eq!(
            err,
            MetadataError::MissingAccessor {
                column: "id".into()
            }
        );
    }
}
