//! Mapping engine: SQL generation, parameter binding, execution and hydration.
//!
//! Every operation is a single request/response against a caller-owned
//! [`StoreConnection`](crate::storage::StoreConnection). Save and Delete issue
//! exactly one statement; LoadAll issues one query and hydrates each row into
//! a fresh entity.

mod dml;
mod ext;
mod hydrate;
mod outcome;
mod query;
mod statement;

pub use dml::{delete, save};
pub use ext::EntityExt;
pub use hydrate::{HydrationReport, hydrate, hydrate_with};
pub use outcome::ExecOutcome;
pub use query::{Loaded, load_all, load_all_with_reports};
pub use statement::{
    SqlStatement, delete_sql, delete_statement, insert_sql, insert_statement, select_all_sql,
    select_all_statement, update_sql, update_statement,
};
