use std::sync::Arc;

use super::column::ColumnDef;
use super::registry;
use super::table::TableDescriptor;
use crate::core::MetadataError;

/// A type whose fields map 1:1 onto the columns of a table.
///
/// Usually implemented with `#[derive(Entity)]`:
///
/// ```
/// use tablemap::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// #[table(name = "Person")]
/// struct Person {
///     #[column(key, read_only)]
///     id: i64,
///     #[column(description = "Name")]
///     name: String,
///     #[column]
///     age: i64,
/// }
///
/// let descriptor = Person::describe().unwrap();
/// assert_eq!(descriptor.table_name(), "Person");
/// assert_eq!(descriptor.key().name(), "id");
/// ```
///
/// `Default` is the factory used when loading rows.
pub trait Entity: Default + 'static {
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Table the entity is stored in, `None` if the type is not mapped.
    fn table_name() -> Option<&'static str>;

    /// Column definitions in declaration order.
    fn columns() -> Vec<ColumnDef<Self>>;

    /// Cached, validated metadata for this type.
    fn describe() -> Result<Arc<TableDescriptor<Self>>, MetadataError> {
        registry::describe::<Self>()
    }
}
