//! Store configuration
//!
//! A Store is always built from an explicit `StoreConfig`; there is no
//! default database path. Configs can be written in code or read from TOML:
//!
//! ```toml
//! journal_mode = "wal"
//! busy_timeout_ms = 5000
//!
//! [target]
//! kind = "file"
//! path = "pages.sqlite"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{config_error, Result};

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// File-backed database, created on first open if missing
    File { path: PathBuf },
    /// Private in-process database, gone when the Store is dropped
    Memory,
}

/// SQLite journal modes accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub target: Target,
    #[serde(default)]
    pub journal_mode: Option<JournalMode>,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
    #[serde(default)]
    pub foreign_keys: bool,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_target(Target::File { path: path.into() })
    }

    pub fn in_memory() -> Self {
        Self::with_target(Target::Memory)
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            journal_mode: None,
            busy_timeout_ms: None,
            foreign_keys: false,
        }
    }

    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = Some(mode);
        self
    }

    pub fn busy_timeout_ms(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    /// Parse a config from TOML text
    ///
    /// # Errors
    ///
    /// `Config` if the text is not valid TOML or does not describe a config.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(e.to_string()))
    }

    /// Read and parse a TOML config file
    ///
    /// # Errors
    ///
    /// `Config` if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = StoreConfig::file("a.sqlite")
            .journal_mode(JournalMode::Wal)
            .busy_timeout_ms(250);
        assert_eq!(
            config.target,
            Target::File {
                path: PathBuf::from("a.sqlite")
            }
        );
        assert_eq!(config.journal_mode, Some(JournalMode::Wal));
        assert_eq!(config.busy_timeout_ms, Some(250));
        assert!(!config.foreign_keys);
    }

    #[test]
    fn test_memory_from_toml() {
        let config = StoreConfig::from_toml_str("[target]\nkind = \"memory\"\n").unwrap();
        assert_eq!(config, StoreConfig::in_memory());
    }

    #[test]
    fn test_file_from_toml() {
        let text = r#"
            journal_mode = "wal"
            busy_timeout_ms = 5000
            foreign_keys = true

            [target]
            kind = "file"
            path = "pages.sqlite"
        "#;
        let config = StoreConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config.target,
            Target::File {
                path: PathBuf::from("pages.sqlite")
            }
        );
        assert_eq!(config.journal_mode, Some(JournalMode::Wal));
        assert_eq!(config.busy_timeout_ms, Some(5000));
        assert!(config.foreign_keys);
    }

    #[test]
    fn test_missing_target_is_config_error() {
        let err = StoreConfig::from_toml_str("busy_timeout_ms = 10").unwrap_err();
        assert!(matches!(err, crate::errors::RowbindError::Config { .. }));
    }

    #[test]
    fn test_unknown_journal_mode_rejected() {
        let text = "journal_mode = \"fast\"\n[target]\nkind = \"memory\"\n";
        assert!(StoreConfig::from_toml_str(text).is_err());
    }
}
