use log::debug;

use super::hydrate::{HydrationReport, hydrate_with};
use super::statement::select_all_statement;
use crate::core::Result;
use crate::metadata::Entity;
use crate::storage::StoreConnection;

/// An entity built from a result row, with its hydration report.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub entity: T,
    pub report: HydrationReport,
}

/// Loads every row of `T`'s table, keeping each row's hydration report.
pub fn load_all_with_reports<T: Entity, C: StoreConnection + ?Sized>(
    conn: &mut C,
) -> Result<Vec<Loaded<T>>> {
    let descriptor = T::describe()?;
    let statement = select_all_statement(descriptor.schema());
    debug!("{}", statement.sql);

    let result = conn.query(&statement.sql, &statement.params)?;
    let loaded = result
        .rows()
        .iter()
        .map(|row| {
            let mut entity = T::default();
            let report = hydrate_with(&descriptor, row, &mut entity);
            Loaded { entity, report }
        })
        .collect::<Vec<_>>();

    debug!("loaded {} row(s) from [{}]", loaded.len(), descriptor.table_name());
    Ok(loaded)
}

/// Loads every row of `T`'s table into fresh default instances.
///
/// Columns that fail to hydrate are logged and left at their defaults.
pub fn load_all<T: Entity, C: StoreConnection + ?Sized>(conn: &mut C) -> Result<Vec<T>> {
    Ok(load_all_with_reports::<T, C>(conn)?
        .into_iter()
        .map(|loaded| loaded.entity)
        .collect())
}
