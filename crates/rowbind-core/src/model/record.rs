//! Record type declarations
//!
//! A mapped type describes itself through a `Declaration`: its display
//! name, its fields in order, and optionally its key field. The field
//! order fixes column order and positional binding.

use crate::errors::Result;
use crate::model::value::{Row, Value};

/// A declared field: name plus native type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub native_type: String,
}

/// Declaration of a mapped record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub type_name: String,
    pub fields: Vec<FieldDecl>,
    pub key: Option<String>,
}

impl Declaration {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            key: None,
        }
    }

    /// Append a field; order of calls is column order
    pub fn field(mut self, name: impl Into<String>, native_type: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            native_type: native_type.into(),
        });
        self
    }

    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.key = Some(name.into());
        self
    }
}

/// A type whose instances are stored as rows of one table.
///
/// Every declared field must be readable through `field` and writable
/// through `set_field`. Instances are always read and written whole.
pub trait Record: Sized + 'static {
    /// The type's declaration. Must not depend on instance state.
    fn declaration() -> Declaration;

    /// Read a field by name; `None` if the name is not declared
    fn field(&self, name: &str) -> Option<Value>;

    /// Write a field by name
    ///
    /// # Errors
    ///
    /// `UnknownField` for undeclared names, `ValueConversion` when the
    /// value does not fit the field's type.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// Rebuild an instance from a fetched row
    ///
    /// # Errors
    ///
    /// `ValueConversion` when a column does not fit its field.
    fn from_row(row: Row) -> Result<Self>;
}
