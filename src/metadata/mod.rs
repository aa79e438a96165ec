//! Static table metadata for entity types.
//!
//! Each entity type registers its table name and ordered column list once
//! (normally through `#[derive(Entity)]`); [`describe`] validates it and caches
//! the resulting [`TableDescriptor`] for the life of the process.

mod column;
mod entity;
mod registry;
mod table;

pub use column::{ColumnDef, ColumnDescriptor, ColumnSchema, Getter, Setter};
pub use entity::Entity;
pub use registry::{cached_count, describe};
pub use table::{TableDescriptor, TableSchema, is_identifier};
