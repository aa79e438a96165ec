mod rows;

pub use rows::{ResultSet, Row};
