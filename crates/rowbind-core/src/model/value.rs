//! Field values and rows
//!
//! `Value` is the engine-neutral representation of one field. Record types
//! convert their fields into values with `From` and back with `FromValue`.

use crate::errors::{Result, RowbindError};

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// Short name of the variant, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

macro_rules! integer_into_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(v as i64)
                }
            }
        )*
    };
}

integer_into_value!(i8, i16, i32, i64, isize, u8, u16, u32);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Conversion from a `Value` back into a Rust field type
pub trait FromValue: Sized {
    /// Semantic name of what this type accepts, for error messages
    const EXPECTED: &'static str;

    /// Returns `None` when the value has the wrong shape
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for char {
    const EXPECTED: &'static str = "single-character text";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            Value::Integer(i) => Some(i != 0),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "real";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Real(r) => Some(r),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "real";

    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|r| r as f32)
    }
}

macro_rules! integer_from_value {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                const EXPECTED: &'static str = concat!("integer (", stringify!($t), ")");

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Integer(i) => <$t>::try_from(i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_from_value!(i8, i16, i32, i64, isize, u8, u16, u32);

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Convert a value for the named field
///
/// # Errors
///
/// `ValueConversion` if the value does not fit `T`.
pub fn convert<T: FromValue>(field: &str, value: Value) -> Result<T> {
    let found = value.type_name();
    T::from_value(value).ok_or_else(|| RowbindError::ValueConversion {
        field: field.to_string(),
        expected: T::EXPECTED.to_string(),
        found: found.to_string(),
    })
}

/// One fetched row: column values in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Option<Value>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), Some(value)));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Borrow a column value by name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Move a column value out of the row and convert it.
    ///
    /// A missing column converts as `NULL`.
    ///
    /// # Errors
    ///
    /// `ValueConversion` if the value does not fit `T`.
    pub fn take<T: FromValue>(&mut self, column: &str) -> Result<T> {
        let value = self
            .columns
            .iter_mut()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.take())
            .unwrap_or(Value::Null);
        convert(column, value)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(3_i32)), Value::Integer(3));
    }

    #[test]
    fn test_bool_accepts_integer_storage() {
        assert_eq!(bool::from_value(Value::Integer(1)), Some(true));
        assert_eq!(bool::from_value(Value::Integer(0)), Some(false));
        assert_eq!(bool::from_value(Value::Text("true".into())), None);
    }

    #[test]
    fn test_real_accepts_integer_storage() {
        assert_eq!(f64::from_value(Value::Integer(2)), Some(2.0));
    }

    #[test]
    fn test_integer_out_of_range() {
        assert_eq!(u8::from_value(Value::Integer(300)), None);
        assert_eq!(i32::from_value(Value::Integer(-5)), Some(-5));
    }

    #[test]
    fn test_row_take_reports_field() {
        let mut row: Row = vec![("visits".to_string(), Value::Text("many".into()))]
            .into_iter()
            .collect();
        let err = row.take::<i64>("visits").unwrap_err();
        assert_eq!(
            err,
            RowbindError::ValueConversion {
                field: "visits".to_string(),
                expected: "integer (i64)".to_string(),
                found: "text".to_string(),
            }
        );
    }

    #[test]
    fn test_row_missing_column_is_null() {
        let mut row = Row::new();
        assert_eq!(row.take::<Option<String>>("title").unwrap(), None);
        assert!(row.take::<String>("url").is_err());
    }
}
