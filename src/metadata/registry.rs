use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use log::{debug, trace};

use super::entity::Entity;
use super::table::TableDescriptor;
use crate::core::MetadataError;

type CachedDescriptor = Arc<dyn Any + Send + Sync>;

lazy_static! {
    static ref DESCRIPTORS: RwLock<HashMap<TypeId, CachedDescriptor>> = RwLock::new(HashMap::new());
}

fn cached<T: Entity>() -> Option<Arc<TableDescriptor<T>>> {
    let guard = DESCRIPTORS.read().unwrap_or_else(PoisonError::into_inner);
    let entry = guard.get(&TypeId::of::<T>())?;
    Arc::clone(entry).downcast::<TableDescriptor<T>>().ok()
}

/// Returns the validated descriptor for `T`, building it on first use.
///
/// Descriptors are immutable once built and shared between threads. Failed
/// validations are not cached; they are deterministic and fail again.
pub fn describe<T: Entity>() -> Result<Arc<TableDescriptor<T>>, MetadataError> {
    if let Some(descriptor) = cached::<T>() {
        trace!("descriptor cache hit for {}", T::type_name());
        return Ok(descriptor);
    }

    let built = Arc::new(TableDescriptor::<T>::build()?);
    debug!(
        "described {} as table '{}' with {} column(s)",
        T::type_name(),
        built.table_name(),
        built.columns().len()
    );

    let mut guard = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    let entry = guard
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Arc::clone(&built) as CachedDescriptor);

    // Another thread may have won the race; hand out its copy.
    Ok(Arc::clone(entry)
        .downcast::<TableDescriptor<T>>()
        .unwrap_or(built))
}

/// Number of descriptors currently cached.
pub fn cached_count() -> usize {
    DESCRIPTORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StorageType, Value};
    use crate::metadata::ColumnDef;

    #[derive(Default)]
    struct Counter {
        id: i64,
    }

    impl Entity for Counter {
        fn table_name() -> Option<&'static str> {
            Some("counter")
        }

        fn columns() -> Vec<ColumnDef<Self>> {
            vec![ColumnDef::new("id", StorageType::Integer).key().accessors(
                |c: &Counter| Value::Integer(c.id),
                |c: &mut Counter, v| {
                    c.id = crate::core::FieldValue::from_value(v)?;
                    Ok(())
                },
            )]
        }
    }

    #[derive(Default)]
    struct Unmapped;

    impl Entity for Unmapped {
        fn table_name() -> Option<&'static str> {
            None
        }

        fn columns() -> Vec<ColumnDef<Self>> {
            Vec::new()
        }
    }

    #[test]
    fn test_describe_is_cached() {
        let first = describe::<Counter>().unwrap();
        let second = describe::<Counter>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cached_count() >= 1);
    }

    #[test]
    fn test_describe_concurrent_readers_share_descriptor() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| describe::<Counter>().unwrap()))
            .collect();
        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for descriptor in &descriptors[1..] {
            assert!(Arc::ptr_eq(&descriptors[0], descriptor));
        }
    }

    #[test]
    fn test_failed_describe_is_not_cached() {
        let err = describe::<Unmapped>().unwrap_err();
        assert!(matches!(err, MetadataError::MissingTableName(_)));
        assert!(cached::<Unmapped>().is_none());
    }
}
