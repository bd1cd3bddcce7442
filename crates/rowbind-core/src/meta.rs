//! Table Metadata
//!
//! `TableMeta` is derived from a `Declaration` once per record type and is
//! immutable afterwards. The registry caches it per `TypeId` for the rest of
//! the process so every Store and every caller sees the same instance.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, OnceLock, RwLock};

use crate::errors::{Result, RowbindError};
use crate::model::record::{Declaration, Record};
use crate::model::semantic_type::{map_native_type, SemanticType};
use crate::model::value::Value;
use crate::naming::table_name;

/// One column of a mapped table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub semantic: SemanticType,
    pub nullable: bool,
}

/// Immutable descriptor of a mapped type's table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    type_name: String,
    table: String,
    fields: Vec<Column>,
    key: Option<String>,
}

impl TableMeta {
    /// Derive metadata from a declaration.
    ///
    /// # Errors
    ///
    /// - `Naming` if the type name yields no table name
    /// - `Mapping` if a field type has no column type
    /// - `InvalidDeclaration` for no fields, duplicate or non-identifier
    ///   field names, or a key that is not a declared field
    pub fn derive(declaration: &Declaration) -> Result<Self> {
        let type_name = declaration.type_name.clone();
        let invalid = |reason: String| RowbindError::InvalidDeclaration {
            type_name: type_name.clone(),
            reason,
        };

        let table = table_name(&declaration.type_name)?;

        if declaration.fields.is_empty() {
            return Err(invalid("no fields declared".to_string()));
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(declaration.fields.len());
        for decl in &declaration.fields {
            if !is_identifier(&decl.name) {
                return Err(invalid(format!("'{}' is not a valid column name", decl.name)));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(invalid(format!("field '{}' declared twice", decl.name)));
            }
            let ty = map_native_type(&decl.name, &decl.native_type)?;
            fields.push(Column {
                name: decl.name.clone(),
                semantic: ty.semantic,
                nullable: ty.nullable,
            });
        }

        if let Some(key) = &declaration.key {
            if !seen.contains(key.as_str()) {
                return Err(invalid(format!("key '{}' is not a declared field", key)));
            }
        }

        tracing::debug!(
            type_name = %type_name,
            table = %table,
            fields = fields.len(),
            "derived table metadata"
        );

        Ok(Self {
            type_name,
            table,
            fields,
            key: declaration.key.clone(),
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in declaration order
    pub fn fields(&self) -> &[Column] {
        &self.fields
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Key field name
    ///
    /// # Errors
    ///
    /// `NoKey` if the type declares none.
    pub fn require_key(&self) -> Result<&str> {
        self.key().ok_or_else(|| RowbindError::NoKey {
            table: self.table.clone(),
        })
    }

    pub fn field(&self, name: &str) -> Option<&Column> {
        self.fields.iter().find(|c| c.name == name)
    }

    /// Full column type text of one field, `PRIMARY KEY` suffix included
    pub fn column_type(&self, name: &str) -> Option<String> {
        self.field(name).map(|c| self.column_type_of(c))
    }

    /// Field name to full column type text, e.g. `url -> "TEXT PRIMARY KEY"`
    pub fn columns(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|c| (c.name.clone(), self.column_type_of(c)))
            .collect()
    }

    /// Comma-separated column names in declaration order
    pub fn column_names(&self) -> String {
        self.fields
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Table name quoted for use in SQL text
    pub fn quoted_table(&self) -> String {
        quote_ident(&self.table)
    }

    /// Quoted column names in declaration order, comma-separated
    pub fn quoted_column_list(&self) -> String {
        self.fields
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this table
    pub fn ddl(&self) -> String {
        let columns = self
            .fields
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), self.column_type_of(c)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.quoted_table(),
            columns
        )
    }

    /// Field values of a record in declaration order
    ///
    /// # Errors
    ///
    /// `UnknownField` if the record cannot read one of its declared fields.
    pub fn values<R: Record>(&self, record: &R) -> Result<Vec<Value>> {
        self.fields
            .iter()
            .map(|c| {
                record
                    .field(&c.name)
                    .ok_or_else(|| RowbindError::UnknownField {
                        type_name: self.type_name.clone(),
                        field: c.name.clone(),
                    })
            })
            .collect()
    }

    fn column_type_of(&self, column: &Column) -> String {
        let keyword = column.semantic.sql_keyword();
        if self.key.as_deref() == Some(column.name.as_str()) {
            format!("{} PRIMARY KEY", keyword)
        } else {
            keyword.to_string()
        }
    }
}

/// Quote an identifier for SQL text, doubling any embedded quote.
///
/// Declared names are always quoted so keywords such as `order` or
/// `group` stay usable as table and column names.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

type Registry = RwLock<HashMap<TypeId, Arc<TableMeta>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Cached metadata for a record type, derived on first reference.
///
/// Failed derivations are not cached; the error is reported on every call.
///
/// # Errors
///
/// Derivation errors from [`TableMeta::derive`].
pub fn meta_of<R: Record>() -> Result<Arc<TableMeta>> {
    let registry = REGISTRY.get_or_init(Registry::default);
    let id = TypeId::of::<R>();

    if let Some(meta) = registry
        .read()
        .map_err(|_| poisoned())?
        .get(&id)
        .cloned()
    {
        return Ok(meta);
    }

    let derived = Arc::new(TableMeta::derive(&R::declaration())?);
    let mut guard = registry.write().map_err(|_| poisoned())?;
    // Another caller may have won the race; keep the first instance.
    Ok(guard.entry(id).or_insert(derived).clone())
}

/// Cached metadata for the type of `record`
///
/// # Errors
///
/// Derivation errors from [`TableMeta::derive`].
pub fn meta_for<R: Record>(_record: &R) -> Result<Arc<TableMeta>> {
    meta_of::<R>()
}

fn poisoned() -> RowbindError {
    RowbindError::Internal {
        message: "metadata registry lock poisoned".to_string(),
    }
}
