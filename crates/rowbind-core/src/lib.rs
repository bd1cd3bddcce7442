//! rowbind core - record-to-table mapping kernel
//!
//! This crate holds everything that does not need a database handle:
//! - Semantic field types and the Type Mapper
//! - Table name derivation from type names
//! - Table Metadata derivation and its process-wide cache
//! - The Statement Builder (DDL, INSERT, UPDATE, SELECT-by-key, upsert)
//! - The `Record` contract and the `record!` declaration macro
//! - Error and logging facilities shared with the store crate

pub mod errors;
pub mod logging_facility;
pub mod meta;
pub mod model;
pub mod naming;
pub mod statements;

#[doc(hidden)]
pub use rowbind_core_types;

pub use errors::{ExError, ExErrorKind, Result, RowbindError};
pub use meta::{meta_for, meta_of, Column, TableMeta};
pub use model::{Declaration, FieldDecl, FromValue, Record, Row, SemanticType, Value};
pub use statements::Statement;
