// ============================================================================
// tablemap Library
// ============================================================================

//! Metadata-driven table mapping.
//!
//! An entity type describes its table once (normally with `#[derive(Entity)]`);
//! the mapper then generates whole-row SQL for it, binds the entity's field
//! values as named parameters, runs the statement on a caller-owned store
//! connection and hydrates entities back from result rows.
//!
//! ```
//! use tablemap::{Entity, EntityExt, SqliteConnection};
//!
//! #[derive(Debug, Default, Entity)]
//! #[table(name = "Person")]
//! struct Person {
//!     #[column(key, read_only)]
//!     id: i64,
//!     #[column]
//!     name: String,
//!     #[column]
//!     age: i64,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = SqliteConnection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE Person (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")?;
//!
//! let ana = Person { name: "Ana".into(), age: 30, ..Default::default() };
//! assert_eq!(ana.save(&mut conn, true)?.affected_rows(), 1);
//!
//! let people = Person::load_all(&mut conn)?;
//! assert_eq!(people[0].name, "Ana");
//! assert_eq!(people[0].id, 1);
//! # Ok(())
//! # }
//! ```

extern crate self as tablemap;

pub mod core;
pub mod fields;
pub mod mapper;
pub mod metadata;
pub mod prelude;
pub mod result;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{
    ConversionError, ExecutionFailure, FieldValue, HydrationSkip, MappingError, MetadataError,
    Result, SkipReason, StorageType, StoreError, Value,
};
pub use fields::{FieldDescriptor, apply_field_descriptors, apply_field_values, field_list};
pub use mapper::{
    EntityExt, ExecOutcome, HydrationReport, Loaded, SqlStatement, delete, hydrate, load_all,
    load_all_with_reports, save,
};
pub use metadata::{ColumnDef, ColumnDescriptor, ColumnSchema, Entity, TableDescriptor, TableSchema, describe};
pub use result::{ResultSet, Row};
pub use storage::{BoundValue, SqliteConfig, SqliteConnection, StoreConnection};

pub use tablemap_derive::Entity;
