use log::warn;

use crate::core::{HydrationSkip, Result, SkipReason};
use crate::metadata::{Entity, TableDescriptor};
use crate::result::Row;

/// Per-row account of which columns were applied and which were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    applied: Vec<String>,
    skipped: Vec<HydrationSkip>,
}

impl HydrationReport {
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    pub fn skipped(&self) -> &[HydrationSkip] {
        &self.skipped
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn was_skipped(&self, column: &str) -> bool {
        self.skipped.iter().any(|skip| skip.column == column)
    }
}

/// Fills `entity` from `row`, column by column.
///
/// A column missing from the row or holding a value the field cannot take is
/// logged and skipped; the field keeps its previous value and the remaining
/// columns are still applied.
pub fn hydrate_with<T>(descriptor: &TableDescriptor<T>, row: &Row, entity: &mut T) -> HydrationReport {
    let mut report = HydrationReport::default();

    for column in descriptor.columns() {
        let reason = match row.get(column.name()) {
            None => SkipReason::MissingColumn,
            Some(value) => match column.set(entity, value.clone()) {
                Ok(()) => {
                    report.applied.push(column.name().to_string());
                    continue;
                }
                Err(err) => SkipReason::Conversion(err),
            },
        };

        let skip = HydrationSkip {
            column: column.name().to_string(),
            reason,
        };
        warn!("hydrating [{}]: {}", descriptor.table_name(), skip);
        report.skipped.push(skip);
    }

    report
}

/// Fills an existing `entity` from `row` using `T`'s cached descriptor.
pub fn hydrate<T: Entity>(row: &Row, entity: &mut T) -> Result<HydrationReport> {
    let descriptor = T::describe()?;
    Ok(hydrate_with(&descriptor, row, entity))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{FieldValue, StorageType, Value};
    use crate::metadata::ColumnDef;

    #[derive(Debug, Default, PartialEq)]
    struct Gauge {
        id: i64,
        label: String,
        reading: f64,
    }

    fn descriptor() -> TableDescriptor<Gauge> {
        TableDescriptor::from_defs(
            "Gauge",
            Some("gauge"),
            vec![
                ColumnDef::new("id", StorageType::Integer).key().read_only().accessors(
                    |g: &Gauge| g.id.to_value(),
                    |g: &mut Gauge, v| {
                        g.id = FieldValue::from_value(v)?;
                        Ok(())
                    },
                ),
                ColumnDef::new("label", StorageType::Text).accessors(
                    |g: &Gauge| g.label.to_value(),
                    |g: &mut Gauge, v| {
                        g.label = FieldValue::from_value(v)?;
                        Ok(())
                    },
                ),
                ColumnDef::new("reading", StorageType::Real).accessors(
                    |g: &Gauge| g.reading.to_value(),
                    |g: &mut Gauge, v| {
                        g.reading = FieldValue::from_value(v)?;
                        Ok(())
                    },
                ),
            ],
        )
        .unwrap()
    }

    fn row(columns: &[&str], values: Vec<Value>) -> Row {
        let columns: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
        Row::new(columns, values)
    }

    #[test]
    fn test_full_hydration() {
        let mut gauge = Gauge::default();
        let report = hydrate_with(
            &descriptor(),
            &row(
                &["id", "label", "reading"],
                vec![Value::Integer(4), Value::Text("boiler".into()), Value::Real(81.5)],
            ),
            &mut gauge,
        );
        assert!(report.is_complete());
        assert_eq!(report.applied(), &["id", "label", "reading"]);
        assert_eq!(
            gauge,
            Gauge {
                id: 4,
                label: "boiler".into(),
                reading: 81.5
            }
        );
    }

    #[test]
    fn test_bad_column_is_skipped_and_keeps_prior_value() {
        let mut gauge = Gauge {
            id: 1,
            label: "old".into(),
            reading: 2.0,
        };
        let report = hydrate_with(
            &descriptor(),
            &row(
                &["id", "label", "reading"],
                vec![Value::Text("nine".into()), Value::Text("new".into()), Value::Integer(3)],
            ),
            &mut gauge,
        );
        assert!(report.was_skipped("id"));
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(gauge.id, 1);
        assert_eq!(gauge.label, "new");
        assert_eq!(gauge.reading, 3.0);
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let mut gauge = Gauge::default();
        let report = hydrate_with(
            &descriptor(),
            &row(&["id", "label"], vec![Value::Integer(2), Value::Text("pump".into())]),
            &mut gauge,
        );
        assert_eq!(
            report.skipped(),
            &[HydrationSkip {
                column: "reading".into(),
                reason: SkipReason::MissingColumn,
            }]
        );
        assert_eq!(gauge.label, "pump");
    }
}
