//! Everything an application needs to declare and persist entities.
//!
//! ```
//! use tablemap::prelude::*;
//! ```

pub use crate::{
    Entity, EntityExt, ExecOutcome, FieldValue, MappingError, SqliteConfig, SqliteConnection,
    StoreConnection, Value,
};
