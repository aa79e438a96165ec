use log::trace;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

use super::engine::{BoundValue, StoreConnection};
use crate::core::{DATETIME_FORMAT, StoreError, Value};
use crate::result::ResultSet;

impl ToSql for BoundValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.value.to_storage(self.storage) {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(i),
            Value::Real(f) => SqlValue::Real(f),
            Value::Text(s) => SqlValue::Text(s),
            Value::Blob(bytes) => SqlValue::Blob(bytes),
            Value::Boolean(b) => SqlValue::Integer(i64::from(b)),
            Value::DateTime(dt) => SqlValue::Text(dt.format(DATETIME_FORMAT).to_string()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        // Invalid UTF-8 stays raw so text fields reject it.
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// [`StoreConnection`] backed by a `rusqlite` connection.
///
/// Parameters are bound by name (`:column`), matching the placeholders the
/// mapper generates.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(rusqlite::Connection::open_in_memory()?))
    }

    /// Run one or more statements without parameters, e.g. DDL setup.
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }

    pub fn into_inner(self) -> rusqlite::Connection {
        self.conn
    }
}

fn named_params(params: &[BoundValue]) -> Vec<String> {
    params.iter().map(BoundValue::placeholder).collect()
}

impl StoreConnection for SqliteConnection {
    fn execute(&mut self, sql: &str, params: &[BoundValue]) -> Result<usize, StoreError> {
        trace!("sqlite execute: {} ({} param(s))", sql, params.len());
        let names = named_params(params);
        let named: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(params)
            .map(|(name, param)| (name.as_str(), param as &dyn ToSql))
            .collect();

        let mut stmt = self.conn.prepare(sql)?;
        Ok(stmt.execute(named.as_slice())?)
    }

    fn query(&mut self, sql: &str, params: &[BoundValue]) -> Result<ResultSet, StoreError> {
        trace!("sqlite query: {} ({} param(s))", sql, params.len());
        let names = named_params(params);
        let named: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(params)
            .map(|(name, param)| (name.as_str(), param as &dyn ToSql))
            .collect();

        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(named.as_slice())?;
        let mut materialized = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(from_value_ref(row.get_ref(idx)?));
            }
            materialized.push(values);
        }

        Ok(ResultSet::new(columns, materialized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StorageType;

    #[test]
    fn test_named_binding_round_trip() {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, flag INTEGER, data BLOB)")
            .unwrap();

        let affected = conn
            .execute(
                "INSERT INTO [t] (flag,data) VALUES (:flag,:data)",
                &[
                    BoundValue::new("flag", Value::Boolean(true), StorageType::Boolean),
                    BoundValue::new("data", Value::Blob(vec![1, 2, 3]), StorageType::Blob),
                ],
            )
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(conn.last_insert_rowid(), 1);

        let result = conn
            .query(
                "SELECT * FROM [t] WHERE id=:id",
                &[BoundValue::new("id", Value::Integer(1), StorageType::Integer)],
            )
            .unwrap();
        assert_eq!(result.columns(), &["id", "flag", "data"]);
        let row = &result.rows()[0];
        assert_eq!(row.get("flag"), Some(&Value::Integer(1)));
        assert_eq!(row.get("data"), Some(&Value::Blob(vec![1, 2, 3])));
    }

    #[test]
    fn test_invalid_utf8_text_is_returned_as_blob() {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        let result = conn
            .query("SELECT CAST(x'41ff42' AS TEXT) AS name, 'ok' AS plain", &[])
            .unwrap();
        let row = &result.rows()[0];
        assert_eq!(row.get("name"), Some(&Value::Blob(vec![0x41, 0xff, 0x42])));
        assert_eq!(row.get("plain"), Some(&Value::Text("ok".into())));
    }

    #[test]
    fn test_rejected_statement_is_an_error() {
        let mut conn = SqliteConnection::open_in_memory().unwrap();
        assert!(conn.execute("INSERT INTO missing (a) VALUES (:a)", &[]).is_err());
    }
}
