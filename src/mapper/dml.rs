use log::{debug, warn};

use super::outcome::ExecOutcome;
use super::statement::{SqlStatement, delete_statement, insert_statement, update_statement};
use crate::core::{ExecutionFailure, Result};
use crate::metadata::Entity;
use crate::storage::StoreConnection;

/// Runs a data-modifying statement, turning store errors into a failed outcome.
pub(crate) fn run_statement<C: StoreConnection + ?Sized>(
    conn: &mut C,
    statement: SqlStatement,
) -> ExecOutcome {
    debug!("{} ({} param(s))", statement.sql, statement.params.len());

    match conn.execute(&statement.sql, &statement.params) {
        Ok(rows) => ExecOutcome::Applied(rows),
        Err(err) => {
            warn!("statement failed: {}: {}", statement.sql, err);
            ExecOutcome::Failed(ExecutionFailure {
                sql: statement.sql,
                message: err.to_string(),
            })
        }
    }
}

/// Inserts (`is_new`) or updates the row for `entity`.
///
/// Uses the entity's in-memory key value; the store is never consulted for it.
/// A read-only key is left to the store on insert and only used in the WHERE
/// clause on update.
pub fn save<T: Entity, C: StoreConnection + ?Sized>(
    conn: &mut C,
    entity: &T,
    is_new: bool,
) -> Result<ExecOutcome> {
    let descriptor = T::describe()?;
    let statement = if is_new {
        insert_statement(&descriptor, entity)
    } else {
        update_statement(&descriptor, entity)?
    };
    Ok(run_statement(conn, statement))
}

/// Deletes the row whose key matches `entity`'s key.
pub fn delete<T: Entity, C: StoreConnection + ?Sized>(conn: &mut C, entity: &T) -> Result<ExecOutcome> {
    let descriptor = T::describe()?;
    Ok(run_statement(conn, delete_statement(&descriptor, entity)))
}
