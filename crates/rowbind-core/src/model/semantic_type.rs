//! Semantic field types and the Type Mapper
//!
//! A field is declared with a native type name. The mapper resolves it to
//! one of the semantic types, each of which has exactly one SQL column
//! type keyword. Unknown native types are a registration error; they are
//! never defaulted.

use crate::errors::{Result, RowbindError};

/// Abstract field type, independent of the engine and of Rust type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Text,
    Integer,
    Real,
    Boolean,
}

impl SemanticType {
    /// SQL column type keyword used in DDL
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SemanticType::Text => "TEXT",
            SemanticType::Integer => "INTEGER",
            SemanticType::Real => "REAL",
            SemanticType::Boolean => "BOOL",
        }
    }

    /// Lower-case semantic name, as accepted in declarations
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Integer => "integer",
            SemanticType::Real => "real",
            SemanticType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved field type: the semantic type plus whether `NULL` is a legal value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub semantic: SemanticType,
    pub nullable: bool,
}

/// Resolve a native type name to its field type.
///
/// `field` is only used for error context.
///
/// # Errors
///
/// `Mapping` if the native type has no storage class.
pub fn map_native_type(field: &str, native_type: &str) -> Result<FieldType> {
    let compact: String = native_type.chars().filter(|c| !c.is_whitespace()).collect();

    let (inner, nullable) = match strip_option(&compact) {
        Some(inner) => (inner, true),
        None => (compact.as_str(), false),
    };

    let semantic = match inner {
        "String" | "str" | "&str" | "&'staticstr" | "Box<str>" | "char" | "text" => {
            SemanticType::Text
        }
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "integer" => {
            SemanticType::Integer
        }
        "f32" | "f64" | "real" => SemanticType::Real,
        "bool" | "boolean" => SemanticType::Boolean,
        _ => {
            return Err(RowbindError::Mapping {
                field: field.to_string(),
                native_type: native_type.to_string(),
            })
        }
    };

    Ok(FieldType { semantic, nullable })
}

fn strip_option(compact: &str) -> Option<&str> {
    ["Option<", "std::option::Option<", "optional<"]
        .iter()
        .find_map(|prefix| compact.strip_prefix(prefix))
        .and_then(|rest| rest.strip_suffix('>'))
}
