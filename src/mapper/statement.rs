use serde::Serialize;

use crate::core::{MappingError, Result};
use crate::metadata::{ColumnSchema, TableDescriptor, TableSchema};
use crate::storage::BoundValue;

/// SQL text plus the parameters to bind by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<BoundValue>,
}

fn placeholder(column: &ColumnSchema) -> String {
    format!(":{}", column.name)
}

/// `INSERT INTO [table] (c1,c2) VALUES (:c1,:c2)`.
///
/// A table whose only column is a store-assigned key inserts
/// `DEFAULT VALUES`.
pub fn insert_sql(schema: &TableSchema) -> String {
    let writable: Vec<&ColumnSchema> = schema.writable_columns().collect();
    if writable.is_empty() {
        return format!("INSERT INTO [{}] DEFAULT VALUES", schema.table_name());
    }

    let columns = writable
        .iter()
        .map(|column| column.name.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let values = writable
        .iter()
        .map(|column| placeholder(column))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "INSERT INTO [{}] ({}) VALUES ({})",
        schema.table_name(),
        columns,
        values
    )
}

/// `UPDATE [table] SET c1=:c1,c2=:c2 WHERE key=:key`.
pub fn update_sql(schema: &TableSchema) -> Result<String> {
    let assignments = schema
        .writable_columns()
        .map(|column| format!("{}={}", column.name, placeholder(column)))
        .collect::<Vec<_>>();
    if assignments.is_empty() {
        return Err(MappingError::NothingToUpdate(schema.table_name().to_string()));
    }

    let key = schema.key();
    Ok(format!(
        "UPDATE [{}] SET {} WHERE {}={}",
        schema.table_name(),
        assignments.join(","),
        key.name,
        placeholder(key)
    ))
}

/// `DELETE FROM table WHERE key=:key`.
pub fn delete_sql(schema: &TableSchema) -> String {
    let key = schema.key();
    format!(
        "DELETE FROM {} WHERE {}={}",
        schema.table_name(),
        key.name,
        placeholder(key)
    )
}

/// `SELECT * FROM [table]`.
pub fn select_all_sql(schema: &TableSchema) -> String {
    format!("SELECT * FROM [{}]", schema.table_name())
}

fn bind_writable<T>(descriptor: &TableDescriptor<T>, entity: &T) -> Vec<BoundValue> {
    descriptor
        .columns()
        .iter()
        .filter(|column| column.schema().is_writable())
        .map(|column| BoundValue::new(column.name(), column.get(entity), column.storage()))
        .collect()
}

fn bind_key<T>(descriptor: &TableDescriptor<T>, entity: &T) -> BoundValue {
    let key = descriptor.key();
    BoundValue::new(key.name(), key.get(entity), key.storage())
}

/// Insert statement bound to the entity's current field values.
pub fn insert_statement<T>(descriptor: &TableDescriptor<T>, entity: &T) -> SqlStatement {
    SqlStatement {
        sql: insert_sql(descriptor.schema()),
        params: bind_writable(descriptor, entity),
    }
}

/// Update statement bound to the entity's current field values.
///
/// The key is bound once: a writable key already appears among the SET
/// parameters under the same name.
pub fn update_statement<T>(descriptor: &TableDescriptor<T>, entity: &T) -> Result<SqlStatement> {
    let sql = update_sql(descriptor.schema())?;
    let mut params = bind_writable(descriptor, entity);
    if !descriptor.key().schema().is_writable() {
        params.push(bind_key(descriptor, entity));
    }
    Ok(SqlStatement { sql, params })
}

pub fn delete_statement<T>(descriptor: &TableDescriptor<T>, entity: &T) -> SqlStatement {
    SqlStatement {
        sql: delete_sql(descriptor.schema()),
        params: vec![bind_key(descriptor, entity)],
    }
}

pub fn select_all_statement(schema: &TableSchema) -> SqlStatement {
    SqlStatement {
        sql: select_all_sql(schema),
        params: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StorageType;

    fn person(key_read_only: bool) -> TableSchema {
        let mut id = ColumnSchema::new("id", StorageType::Integer);
        id.is_key = true;
        id.read_only = key_read_only;
        TableSchema::build(
            "Person",
            Some("Person"),
            vec![
                id,
                ColumnSchema::new("name", StorageType::Text),
                ColumnSchema::new("age", StorageType::Integer),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_read_only_key_left_out_of_value_lists() {
        let schema = person(true);
        assert_eq!(insert_sql(&schema), "INSERT INTO [Person] (name,age) VALUES (:name,:age)");
        assert_eq!(
            update_sql(&schema).unwrap(),
            "UPDATE [Person] SET name=:name,age=:age WHERE id=:id"
        );
        assert_eq!(delete_sql(&schema), "DELETE FROM Person WHERE id=:id");
        assert_eq!(select_all_sql(&schema), "SELECT * FROM [Person]");
    }

    #[test]
    fn test_writable_key_is_a_regular_column() {
        let schema = person(false);
        assert_eq!(
            insert_sql(&schema),
            "INSERT INTO [Person] (id,name,age) VALUES (:id,:name,:age)"
        );
        assert_eq!(
            update_sql(&schema).unwrap(),
            "UPDATE [Person] SET id=:id,name=:name,age=:age WHERE id=:id"
        );
    }

    #[test]
    fn test_key_only_table() {
        let mut id = ColumnSchema::new("id", StorageType::Integer);
        id.is_key = true;
        id.read_only = true;
        let schema = TableSchema::build("Ticket", Some("Ticket"), vec![id]).unwrap();

        assert_eq!(insert_sql(&schema), "INSERT INTO [Ticket] DEFAULT VALUES");
        assert!(matches!(
            update_sql(&schema),
            Err(MappingError::NothingToUpdate(table)) if table == "Ticket"
        ));
    }
}
