pub mod config;
pub mod engine;
pub mod sqlite;

pub use config::SqliteConfig;
pub use engine::{BoundValue, StoreConnection};
pub use sqlite::SqliteConnection;
