use std::path::{Path, PathBuf};

use rusqlite::OpenFlags;
use serde::Deserialize;

use super::sqlite::SqliteConnection;
use crate::core::StoreError;

/// SQLite connection configuration
///
/// Similar to the `sqlite://` connection strings used by sqlx and friends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file, `None` for a private in-memory database
    pub path: Option<PathBuf>,

    /// Create the database file when it does not exist
    pub create_if_missing: bool,

    /// Open the database read-only
    pub read_only: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: None,
            create_if_missing: true,
            read_only: false,
        }
    }
}

impl SqliteConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Configuration for a database file
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Set whether a missing file is created
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set read-only mode
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Parse from connection string
    ///
    /// Format: `sqlite::memory:` or `sqlite://<path>`
    ///
    /// # Examples
    ///
    /// ```
    /// use tablemap::SqliteConfig;
    ///
    /// let config = SqliteConfig::from_url("sqlite://data/app.db").unwrap();
    /// assert_eq!(config.path.unwrap().to_str(), Some("data/app.db"));
    /// assert!(SqliteConfig::from_url("sqlite::memory:").unwrap().path.is_none());
    /// ```
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let url = url.trim();
        if url == "sqlite::memory:" || url == "sqlite://:memory:" {
            return Ok(Self::in_memory());
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .ok_or_else(|| StoreError::Config(format!("URL must start with sqlite://, got '{}'", url)))?;

        if path.is_empty() {
            return Err(StoreError::Config("Missing database path".into()));
        }

        Ok(Self::file(path))
    }

    fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }

    /// Open a connection with this configuration
    pub fn open(&self) -> Result<SqliteConnection, StoreError> {
        let conn = match &self.path {
            Some(path) => rusqlite::Connection::open_with_flags(path, self.open_flags())?,
            None => rusqlite::Connection::open_in_memory()?,
        };
        Ok(SqliteConnection::new(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(SqliteConfig::from_url("sqlite::memory:").unwrap(), SqliteConfig::in_memory());
        assert_eq!(
            SqliteConfig::from_url("sqlite://people.db").unwrap(),
            SqliteConfig::file("people.db")
        );
        assert!(SqliteConfig::from_url("postgres://localhost/db").is_err());
        assert!(SqliteConfig::from_url("sqlite://").is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SqliteConfig = serde_json::from_str(r#"{"path": "app.db"}"#).unwrap();
        assert_eq!(config.path, Some(PathBuf::from("app.db")));
        assert!(config.create_if_missing);
        assert!(!config.read_only);
    }

    #[test]
    fn test_missing_file_without_create_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::file(dir.path().join("absent.db")).create_if_missing(false);
        assert!(config.open().is_err());
    }
}
