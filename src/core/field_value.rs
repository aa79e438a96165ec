use chrono::NaiveDateTime;

use super::error::ConversionError;
use super::value::{DATETIME_FORMAT, StorageType, Value};

/// Conversion between a Rust field type and a [`Value`].
///
/// `#[derive(Entity)]` uses the associated constants to infer a column's
/// storage type and nullability from the field type.
pub trait FieldValue: Sized {
    const STORAGE: StorageType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T, ConversionError> {
    Err(ConversionError::new(expected, value.type_name()))
}

impl FieldValue for i64 {
    const STORAGE: StorageType = StorageType::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value.as_i64() {
            Some(i) => Ok(i),
            None => mismatch("INTEGER", &value),
        }
    }
}

impl FieldValue for i32 {
    const STORAGE: StorageType = StorageType::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| ConversionError::new("INTEGER (i32)", wide.to_string()))
    }
}

impl FieldValue for u32 {
    const STORAGE: StorageType = StorageType::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        let wide = i64::from_value(value)?;
        u32::try_from(wide).map_err(|_| ConversionError::new("INTEGER (u32)", wide.to_string()))
    }
}

impl FieldValue for f64 {
    const STORAGE: StorageType = StorageType::Real;

    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value.as_f64() {
            Some(f) => Ok(f),
            None => mismatch("REAL", &value),
        }
    }
}

impl FieldValue for f32 {
    const STORAGE: StorageType = StorageType::Real;

    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        let wide = f64::from_value(value)?;
        let narrow = wide as f32;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(ConversionError::new("REAL (f32)", wide.to_string()));
        }
        Ok(narrow)
    }
}

impl FieldValue for bool {
    const STORAGE: StorageType = StorageType::Boolean;

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Boolean(b) => Ok(b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            other => mismatch("BOOLEAN", &other),
        }
    }
}

impl FieldValue for String {
    const STORAGE: StorageType = StorageType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(s) => Ok(s),
            other => mismatch("TEXT", &other),
        }
    }
}

impl FieldValue for Vec<u8> {
    const STORAGE: StorageType = StorageType::Blob;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Blob(bytes) => Ok(bytes),
            Value::Text(s) => Ok(s.into_bytes()),
            other => mismatch("BLOB", &other),
        }
    }
}

impl FieldValue for NaiveDateTime {
    const STORAGE: StorageType = StorageType::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            Value::Text(s) => NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(|_| ConversionError::new("DATETIME", format!("'{}'", s))),
            other => mismatch("DATETIME", &other),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const STORAGE: StorageType = T::STORAGE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversions() {
        assert_eq!(i64::from_value(Value::Integer(7)), Ok(7));
        assert_eq!(i64::from_value(Value::Real(7.0)), Ok(7));
        assert!(i64::from_value(Value::Text("seven".into())).is_err());
        assert!(i32::from_value(Value::Integer(i64::MAX)).is_err());
        assert!(u32::from_value(Value::Integer(-1)).is_err());
    }

    #[test]
    fn test_f32_range() {
        assert_eq!(f32::from_value(Value::Real(1.5)), Ok(1.5));
        assert_eq!(f32::from_value(Value::Real(f64::INFINITY)), Ok(f32::INFINITY));
        let err = f32::from_value(Value::Real(1e300)).unwrap_err();
        assert_eq!(err.expected, "REAL (f32)");
    }

    #[test]
    fn test_null_only_fits_options() {
        assert!(String::from_value(Value::Null).is_err());
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<i64>::from_value(Value::Integer(3)),
            Ok(Some(3))
        );
        assert!(<Option<i64> as FieldValue>::NULLABLE);
        assert!(!<i64 as FieldValue>::NULLABLE);
    }

    #[test]
    fn test_bool_from_integer() {
        assert_eq!(bool::from_value(Value::Integer(1)), Ok(true));
        assert_eq!(bool::from_value(Value::Integer(0)), Ok(false));
        assert!(bool::from_value(Value::Integer(2)).is_err());
    }

    #[test]
    fn test_datetime_from_text() {
        let dt = NaiveDateTime::from_value(Value::Text("2023-12-31 23:59:58".into())).unwrap();
        assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "2023-12-31 23:59:58");
        assert!(NaiveDateTime::from_value(Value::Text("yesterday".into())).is_err());
    }
}
