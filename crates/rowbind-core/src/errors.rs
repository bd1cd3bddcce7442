use thiserror::Error;

/// Result type alias using RowbindError
pub type Result<T> = std::result::Result<T, RowbindError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that is recorded by the logging
/// macros and can be matched on by callers without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registration
    Mapping,
    Naming,
    InvalidDeclaration,

    // Operations
    NoKey,
    ConstraintViolation,
    UnknownField,
    ValueConversion,

    // Integration
    Persistence,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Mapping => "ERR_MAPPING",
            ExErrorKind::Naming => "ERR_NAMING",
            ExErrorKind::InvalidDeclaration => "ERR_INVALID_DECLARATION",
            ExErrorKind::NoKey => "ERR_NO_KEY",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            ExErrorKind::ValueConversion => "ERR_VALUE_CONVERSION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the operation and table the error
/// was raised for.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for mapping and persistence operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowbindError {
    /// A declared field type has no SQL column type
    #[error("Cannot map type '{native_type}' of field '{field}' to a column type")]
    Mapping { field: String, native_type: String },

    /// The type name contains no capitalized word segment
    #[error("Cannot derive a table name from type name '{type_name}'")]
    Naming { type_name: String },

    /// The declaration is structurally unusable (no fields, bad key, bad identifier)
    #[error("Invalid declaration for '{type_name}': {reason}")]
    InvalidDeclaration { type_name: String, reason: String },

    /// Keyed operation on a type that declares no key
    #[error("Primary key is not defined: {table}")]
    NoKey { table: String },

    /// The engine rejected a write because of a schema constraint
    #[error("Constraint violated on {table}: {message}")]
    Constraint { table: String, message: String },

    /// Field name not declared on the record type
    #[error("Unknown field '{field}' on {type_name}")]
    UnknownField { type_name: String, field: String },

    /// A value could not be converted to the field's Rust type
    #[error("Field '{field}' expected {expected}, found {found}")]
    ValueConversion {
        field: String,
        expected: String,
        found: String,
    },

    /// Engine-level failure, propagated unchanged
    #[error("Persistence error in {op}: {message}")]
    Persistence { op: String, message: String },

    /// Store configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<RowbindError> for ExError {
    fn from(err: RowbindError) -> Self {
        let message = err.to_string();
        match err {
            RowbindError::Mapping { .. } => ExError::new(ExErrorKind::Mapping)
                .with_op("derive_meta")
                .with_message(message),
            RowbindError::Naming { .. } => ExError::new(ExErrorKind::Naming)
                .with_op("derive_table_name")
                .with_message(message),
            RowbindError::InvalidDeclaration { .. } => {
                ExError::new(ExErrorKind::InvalidDeclaration)
                    .with_op("derive_meta")
                    .with_message(message)
            }
            RowbindError::NoKey { table } => ExError::new(ExErrorKind::NoKey)
                .with_table(table)
                .with_message(message),
            RowbindError::Constraint { table, .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_table(table)
                    .with_message(message)
            }
            RowbindError::UnknownField { .. } => {
                ExError::new(ExErrorKind::UnknownField).with_message(message)
            }
            RowbindError::ValueConversion { .. } => {
                ExError::new(ExErrorKind::ValueConversion).with_message(message)
            }
            RowbindError::Persistence { op, .. } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),
            RowbindError::Config { .. } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }
            RowbindError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::Mapping, "ERR_MAPPING"),
            (ExErrorKind::Naming, "ERR_NAMING"),
            (ExErrorKind::NoKey, "ERR_NO_KEY"),
            (ExErrorKind::ConstraintViolation, "ERR_CONSTRAINT_VIOLATION"),
            (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        ];
        for (kind, code) in cases {
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn test_no_key_converts_with_table() {
        let ex: ExError = RowbindError::NoKey {
            table: "web_page".to_string(),
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::NoKey);
        assert_eq!(ex.table(), Some("web_page"));
        assert!(ex.message().contains("web_page"));
    }

    #[test]
    fn test_display_includes_code_and_op() {
        let ex = ExError::new(ExErrorKind::Persistence)
            .with_op("insert")
            .with_message("disk I/O error");
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_PERSISTENCE]"));
        assert!(rendered.contains("'insert'"));
        assert!(rendered.contains("disk I/O error"));
    }
}
