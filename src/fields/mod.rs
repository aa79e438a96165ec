//! Neutral field-list contract for presentation adapters.
//!
//! An adapter receives one [`FieldDescriptor`] per column, renders it however
//! it likes, and hands back `(field_id, value)` pairs which are written into
//! the entity through the same accessors the mapper uses.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::{MappingError, Result, StorageType, Value};
use crate::metadata::{Entity, TableDescriptor};

/// Display format handed to adapters for date-time fields.
pub const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field_id: String,
    pub label: String,
    pub current_value: Value,
    pub required: bool,
    pub read_only: bool,
    pub display_format: Option<String>,
}

/// Builds the field list for `entity`, stamping new date-time fields with `now`.
pub fn field_list_with<T>(
    descriptor: &TableDescriptor<T>,
    entity: &T,
    is_new: bool,
    now: NaiveDateTime,
) -> Vec<FieldDescriptor> {
    descriptor
        .columns()
        .iter()
        .map(|column| {
            let schema = column.schema();
            let is_datetime = schema.storage == StorageType::DateTime;

            let mut current_value = column.get(entity);
            if is_new {
                if let Some(default) = &schema.default_value {
                    current_value = default.clone();
                }
                if is_datetime {
                    current_value = Value::DateTime(now);
                }
            }

            FieldDescriptor {
                field_id: schema.field.clone(),
                label: format!("{}: ", schema.label()),
                current_value,
                required: !schema.allow_null,
                read_only: schema.read_only,
                display_format: is_datetime.then(|| DATE_DISPLAY_FORMAT.to_string()),
            }
        })
        .collect()
}

/// Field list for `entity` in column order.
///
/// For a new entity, declared defaults replace current values and date-time
/// fields start at the current local time.
pub fn field_list<T: Entity>(entity: &T, is_new: bool) -> Result<Vec<FieldDescriptor>> {
    let descriptor = T::describe()?;
    Ok(field_list_with(&descriptor, entity, is_new, Local::now().naive_local()))
}

/// Writes adapter values back into `entity`, keyed by field id.
///
/// Unknown ids are rejected before anything is written. A conversion failure
/// stops at that field; fields before it have already been applied.
pub fn apply_field_values<T, I, K>(entity: &mut T, values: I) -> Result<()>
where
    T: Entity,
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let descriptor = T::describe()?;
    let values: Vec<(K, Value)> = values.into_iter().collect();

    if let Some((unknown, _)) = values
        .iter()
        .find(|(field_id, _)| descriptor.column_by_field(field_id.as_ref()).is_none())
    {
        return Err(MappingError::UnknownField(unknown.as_ref().to_string()));
    }

    for (field_id, value) in values {
        let field_id = field_id.as_ref();
        if let Some(column) = descriptor.column_by_field(field_id) {
            column.set(entity, value).map_err(|source| MappingError::Conversion {
                field: field_id.to_string(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Writes back a field list as returned by an adapter.
pub fn apply_field_descriptors<T: Entity>(entity: &mut T, fields: &[FieldDescriptor]) -> Result<()> {
    apply_field_values(
        entity,
        fields
            .iter()
            .map(|field| (field.field_id.as_str(), field.current_value.clone())),
    )
}
