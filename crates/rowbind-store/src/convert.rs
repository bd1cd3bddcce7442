//! Marshalling between core values and SQLite values
//!
//! Booleans are stored as 0/1 integers. On the way back the declared
//! column type decides the shape: any non-zero integer in a boolean column
//! reads as `true`, and integers in a real column read as reals.

use rowbind_core::{Column, SemanticType, Value};
use rusqlite::types::Value as SqlValue;

pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
    }
}

pub fn from_sql(column: &Column, value: SqlValue) -> Value {
    match (column.semantic, value) {
        (_, SqlValue::Null) => Value::Null,
        (SemanticType::Boolean, SqlValue::Integer(i)) => Value::Boolean(i != 0),
        (SemanticType::Real, SqlValue::Integer(i)) => Value::Real(i as f64),
        (_, SqlValue::Integer(i)) => Value::Integer(i),
        (_, SqlValue::Real(r)) => Value::Real(r),
        (_, SqlValue::Text(s)) => Value::Text(s),
        (_, SqlValue::Blob(b)) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}
