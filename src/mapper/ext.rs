use super::dml;
use super::hydrate::{HydrationReport, hydrate};
use super::outcome::ExecOutcome;
use super::query;
use crate::core::{Result, Value};
use crate::fields::{self, FieldDescriptor};
use crate::metadata::Entity;
use crate::result::Row;
use crate::storage::StoreConnection;

/// Method-call sugar over the mapper functions for every [`Entity`].
pub trait EntityExt: Entity {
    fn save<C: StoreConnection + ?Sized>(&self, conn: &mut C, is_new: bool) -> Result<ExecOutcome> {
        dml::save(conn, self, is_new)
    }

    fn delete<C: StoreConnection + ?Sized>(&self, conn: &mut C) -> Result<ExecOutcome> {
        dml::delete(conn, self)
    }

    fn fill_from_row(&mut self, row: &Row) -> Result<HydrationReport> {
        hydrate(row, self)
    }

    fn load_all<C: StoreConnection + ?Sized>(conn: &mut C) -> Result<Vec<Self>> {
        query::load_all(conn)
    }

    fn field_list(&self, is_new: bool) -> Result<Vec<FieldDescriptor>> {
        fields::field_list(self, is_new)
    }

    fn set_values<I, K>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        fields::apply_field_values(self, values)
    }
}

impl<T: Entity> EntityExt for T {}
