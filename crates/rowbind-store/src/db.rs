//! Database connection management

use std::time::Duration;

use rusqlite::Connection;

use crate::config::{StoreConfig, Target};
use crate::errors::{persistence, Result};

/// Open the configured target
///
/// # Errors
///
/// `Persistence` if the engine cannot open the target.
pub fn open(target: &Target) -> Result<Connection> {
    match target {
        Target::File { path } => Connection::open(path),
        Target::Memory => Connection::open_in_memory(),
    }
    .map_err(|e| persistence("open", e))
}

/// Apply the configured pragmas to a fresh connection
///
/// # Errors
///
/// `Persistence` if a pragma is rejected.
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    if let Some(ms) = config.busy_timeout_ms {
        conn.busy_timeout(Duration::from_millis(ms))
            .map_err(|e| persistence("configure", e))?;
    }

    if config.foreign_keys {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| persistence("configure", e))?;
    }

    if let Some(mode) = config.journal_mode {
        // journal_mode answers with the mode actually in effect
        let applied: String = conn
            .pragma_update_and_check(None, "journal_mode", mode.as_str(), |row| row.get(0))
            .map_err(|e| persistence("configure", e))?;
        tracing::debug!(requested = mode.as_str(), applied = %applied, "journal mode set");
    }

    Ok(())
}

/// Open and configure in one step
///
/// # Errors
///
/// `Persistence` from [`open`] or [`configure`].
pub fn connect(config: &StoreConfig) -> Result<Connection> {
    let conn = open(&config.target)?;
    configure(&conn, config)?;
    tracing::debug!(target_kind = ?config.target, "connection opened");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalMode;

    #[test]
    fn test_connect_in_memory() {
        let conn = connect(&StoreConfig::in_memory()).unwrap();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn test_pragmas_applied() {
        let config = StoreConfig::in_memory()
            .journal_mode(JournalMode::Memory)
            .busy_timeout_ms(100);
        let config = StoreConfig {
            foreign_keys: true,
            ..config
        };
        let conn = connect(&config).unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "memory");
    }

    #[test]
    fn test_open_failure_reports_open() {
        let target = Target::File {
            path: std::path::PathBuf::from("/nonexistent-dir/for/rowbind/db.sqlite"),
        };
        let err = open(&target).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::RowbindError::Persistence { ref op, .. } if op == "open"
        ));
    }
}
