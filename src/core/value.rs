use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text layout used when a `DateTime` value crosses the store boundary.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Real(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
            Self::Boolean(_) => "BOOLEAN",
            Self::DateTime(_) => "DATETIME",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Boolean(b) => Some(i64::from(*b)),
            Self::Real(f) => {
                if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts the value into the shape the store persists for `storage`.
    ///
    /// Booleans become 0/1, date-times become text and integers bound to a
    /// text column are rendered as text. Anything else is passed through and
    /// left for the store to accept or reject.
    pub fn to_storage(&self, storage: StorageType) -> Value {
        match (storage, self) {
            (StorageType::Text, Self::Integer(i)) => Self::Text(i.to_string()),
            (_, Self::DateTime(dt)) => Self::Text(dt.format(DATETIME_FORMAT).to_string()),
            (_, Self::Boolean(b)) => Self::Integer(i64::from(*b)),
            _ => self.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Integer(i), Self::Real(f)) | (Self::Real(f), Self::Integer(i)) => {
                *i as f64 == *f
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(fl) => write!(f, "{}", fl),
            Self::Text(s) => write!(f, "{}", s),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// Column storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    Text,
    Integer,
    Real,
    Blob,
    Boolean,
    DateTime,
}

impl StorageType {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" | "string" => Some(Self::Text),
            "integer" | "int" => Some(Self::Integer),
            "real" | "float" | "double" => Some(Self::Real),
            "blob" => Some(Self::Blob),
            "boolean" | "bool" => Some(Self::Boolean),
            "datetime" | "timestamp" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Rust field type used when generating entity templates.
    pub fn rust_type(&self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::Integer => "i64",
            Self::Real => "f64",
            Self::Blob => "Vec<u8>",
            Self::Boolean => "bool",
            Self::DateTime => "chrono::NaiveDateTime",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "TEXT"),
            Self::Integer => write!(f, "INTEGER"),
            Self::Real => write!(f, "REAL"),
            Self::Blob => write!(f, "BLOB"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::DateTime => write!(f, "DATETIME"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Integer(42), Value::Integer(42));
        assert_eq!(Value::Real(3.5), Value::Integer(3).as_f64().map(|f| Value::Real(f + 0.5)).unwrap());
        assert_ne!(Value::Text("a".into()), Value::Blob(b"a".to_vec()));
        assert_eq!(Value::Integer(2), Value::Real(2.0));
    }

    #[test]
    fn test_real_equality_is_exact() {
        assert_eq!(Value::Real(f64::INFINITY), Value::Real(f64::INFINITY));
        assert_ne!(Value::Real(f64::INFINITY), Value::Real(f64::NEG_INFINITY));
        assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));
        assert_ne!(Value::Real(1e-20), Value::Real(3e-20));
    }

    #[test]
    fn test_to_storage() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(
            Value::DateTime(dt).to_storage(StorageType::DateTime),
            Value::Text("2024-03-01 08:30:00".into())
        );
        assert_eq!(
            Value::Boolean(true).to_storage(StorageType::Boolean),
            Value::Integer(1)
        );
        assert_eq!(
            Value::Text("x".into()).to_storage(StorageType::Text),
            Value::Text("x".into())
        );
    }

    #[test]
    fn test_storage_type_parse() {
        assert_eq!(StorageType::parse("INTEGER"), Some(StorageType::Integer));
        assert_eq!(StorageType::parse("string"), Some(StorageType::Text));
        assert_eq!(StorageType::parse("decimal"), None);
    }
}
