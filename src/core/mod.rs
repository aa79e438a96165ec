pub mod error;
pub mod field_value;
pub mod value;

pub use error::{
    ConversionError, ExecutionFailure, HydrationSkip, MappingError, MetadataError, Result,
    SkipReason, StoreError,
};
pub use field_value::FieldValue;
pub use value::{DATETIME_FORMAT, StorageType, Value};
