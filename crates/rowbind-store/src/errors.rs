//! Error handling for rowbind-store
//!
//! Maps engine errors onto the core taxonomy. Constraint failures become
//! `Constraint`; everything else is passed through as `Persistence` with
//! the engine's own message.

pub use rowbind_core::errors::{Result, RowbindError};

/// Map a rusqlite error raised while running `op` against `table`
pub fn from_rusqlite(op: &str, table: &str, err: rusqlite::Error) -> RowbindError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            RowbindError::Constraint {
                table: table.to_string(),
                message: message.clone().unwrap_or_else(|| failure.to_string()),
            }
        }
        _ => persistence(op, err),
    }
}

/// Engine error with no table context
pub fn persistence(op: &str, err: rusqlite::Error) -> RowbindError {
    RowbindError::Persistence {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Create a configuration error
pub fn config_error(reason: impl Into<String>) -> RowbindError {
    RowbindError::Config {
        message: reason.into(),
    }
}
