use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ConversionError, StorageType, Value};

/// Reads a column's current value out of an entity.
pub type Getter<T> = fn(&T) -> Value;

/// Writes a store value into an entity's field.
pub type Setter<T> = fn(&mut T, Value) -> Result<(), ConversionError>;

/// Accessor-free description of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Name of the entity field backing the column.
    pub field: String,
    pub description: Option<String>,
    pub storage: StorageType,
    pub is_key: bool,
    pub read_only: bool,
    pub allow_null: bool,
    pub default_value: Option<Value>,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, storage: StorageType) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            description: None,
            storage,
            is_key: false,
            read_only: false,
            allow_null: false,
            default_value: None,
        }
    }

    /// Whether the column's value goes into INSERT and UPDATE value lists.
    ///
    /// Only a read-only key is excluded; it is assigned by the store.
    pub fn is_writable(&self) -> bool {
        !(self.is_key && self.read_only)
    }

    /// Human-readable label, falling back to the column name.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

/// Registration-time column definition, as returned by
/// [`Entity::columns`](super::Entity::columns).
///
/// Accessors are optional here so that a definition missing one is reported
/// by [`describe`](super::describe) instead of failing to build.
pub struct ColumnDef<T> {
    pub(crate) schema: ColumnSchema,
    pub(crate) getter: Option<Getter<T>>,
    pub(crate) setter: Option<Setter<T>>,
}

impl<T> ColumnDef<T> {
    pub fn new(name: impl Into<String>, storage: StorageType) -> Self {
        Self {
            schema: ColumnSchema::new(name, storage),
            getter: None,
            setter: None,
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.schema.field = field.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    pub fn key(mut self) -> Self {
        self.schema.is_key = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.schema.read_only = true;
        self
    }

    pub fn nullable(mut self, allow_null: bool) -> Self {
        self.schema.allow_null = allow_null;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.schema.default_value = Some(value.into());
        self
    }

    pub fn getter(mut self, getter: Getter<T>) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn setter(mut self, setter: Setter<T>) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn accessors(self, getter: Getter<T>, setter: Setter<T>) -> Self {
        self.getter(getter).setter(setter)
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }
}

/// A validated column bound to its entity field.
pub struct ColumnDescriptor<T> {
    schema: ColumnSchema,
    getter: Getter<T>,
    setter: Setter<T>,
}

impl<T> ColumnDescriptor<T> {
    pub(crate) fn new(schema: ColumnSchema, getter: Getter<T>, setter: Setter<T>) -> Self {
        Self {
            schema,
            getter,
            setter,
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn storage(&self) -> StorageType {
        self.schema.storage
    }

    pub fn is_key(&self) -> bool {
        self.schema.is_key
    }

    pub fn get(&self, entity: &T) -> Value {
        (self.getter)(entity)
    }

    pub fn set(&self, entity: &mut T, value: Value) -> Result<(), ConversionError> {
        (self.setter)(entity, value)
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            getter: self.getter,
            setter: self.setter,
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_key_is_not_writable() {
        let mut column = ColumnSchema::new("id", StorageType::Integer);
        column.is_key = true;
        assert!(column.is_writable());
        column.read_only = true;
        assert!(!column.is_writable());

        let mut plain = ColumnSchema::new("created", StorageType::DateTime);
        plain.read_only = true;
        assert!(plain.is_writable());
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let def = ColumnDef::<()>::new("name", StorageType::Text);
        assert_eq!(def.schema().label(), "name");
        let def = def.description("Full name");
        assert_eq!(def.schema().label(), "Full name");
    }
}
