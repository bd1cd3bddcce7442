//! The Store: one connection, every CRUD operation over mapped types
//!
//! ## Lifecycle
//!
//! - Construction never touches the database.
//! - The connection opens on the first operation and is reused for every
//!   mapped type. It is released when the Store is dropped, or explicitly
//!   through [`Store::close`].
//! - Each record type is prepared (its `CREATE TABLE IF NOT EXISTS` issued)
//!   at most once per Store. Preparation is never undone, not even by
//!   [`Store::drop_table`]; recreate a dropped table with
//!   [`Store::create_table`].
//!
//! ## Logging Ownership
//!
//! Every public operation logs `start`, then `end` or `end_error`.
//! Statement execution logs SQL text at debug level, never bound values.
//!
//! ## Update results
//!
//! `update` reports "no row matched" as `Ok(false)`. That outcome is not
//! distinguished from a key that exists in a differently shaped table, so a
//! schema mismatch shows up as a silent `false`.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use rowbind_core::statements::{self, Statement};
use rowbind_core::{log_op_end, log_op_error, log_op_start};
use rowbind_core::{meta_of, Record, Row, TableMeta, Value};
use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::config::StoreConfig;
use crate::convert;
use crate::db;
use crate::errors::{from_rusqlite, persistence, Result, RowbindError};

pub struct Store {
    config: StoreConfig,
    conn: Option<Connection>,
    prepared: HashSet<TypeId>,
}

impl Store {
    /// Create a Store for the given target. Does not open the database.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: None,
            prepared: HashSet::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreConfig::in_memory())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether the connection has been opened
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Metadata of a record type, without opening the connection
    ///
    /// # Errors
    ///
    /// `Mapping`, `Naming` or `InvalidDeclaration` if `R`'s declaration
    /// cannot be mapped.
    pub fn meta<R: Record>() -> Result<Arc<TableMeta>> {
        meta_of::<R>()
    }

    /// Open the connection if needed and make sure `R`'s table exists.
    ///
    /// Issues DDL at most once per type for the life of this Store.
    ///
    /// # Errors
    ///
    /// Metadata errors for `R`, `Persistence` if the database cannot be
    /// opened or the table cannot be created.
    pub fn prepare<R: Record>(&mut self) -> Result<Arc<TableMeta>> {
        self.instrumented::<R, _, _>("prepare", |store| store.prepare_impl::<R>())
    }

    /// Create `R`'s table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Metadata errors for `R`, `Persistence` from the engine.
    pub fn create_table<R: Record>(&mut self) -> Result<()> {
        self.instrumented::<R, _, _>("create_table", |store| {
            let meta = store.prepare_impl::<R>()?;
            store.execute("create_table", &meta, &statements::create_table(&meta))?;
            Ok(())
        })
    }

    /// Drop `R`'s table. An absent table is not an error.
    ///
    /// # Errors
    ///
    /// Metadata errors for `R`, `Persistence` from the engine.
    pub fn drop_table<R: Record>(&mut self) -> Result<()> {
        self.instrumented::<R, _, _>("drop_table", |store| {
            let meta = store.prepare_impl::<R>()?;
            store.execute("drop_table", &meta, &statements::drop_table(&meta))?;
            Ok(())
        })
    }

    /// Delete every row of `R`'s table, keeping the table
    ///
    /// # Errors
    ///
    /// Metadata errors for `R`, `Persistence` from the engine.
    pub fn truncate<R: Record>(&mut self) -> Result<()> {
        self.instrumented::<R, _, _>("truncate", |store| {
            let meta = store.prepare_impl::<R>()?;
            store.execute("truncate", &meta, &statements::truncate(&meta))?;
            Ok(())
        })
    }

    /// Insert a new row.
    ///
    /// # Errors
    ///
    /// `Constraint` if a row with the same key already exists,
    /// `UnknownField` if `record` cannot read one of its declared fields.
    pub fn insert<R: Record>(&mut self, record: &R) -> Result<()> {
        self.instrumented::<R, _, _>("insert", |store| {
            let meta = store.prepare_impl::<R>()?;
            let statement = statements::insert(&meta, meta.values(record)?)?;
            store.execute("insert", &meta, &statement)?;
            Ok(())
        })
    }

    /// Overwrite the row with `record`'s key.
    ///
    /// Returns whether exactly one row was updated. A missing row is
    /// `Ok(false)`, not an error, and nothing is inserted.
    ///
    /// # Errors
    ///
    /// `NoKey` if `R` declares no key, raised before the database is touched.
    pub fn update<R: Record>(&mut self, record: &R) -> Result<bool> {
        self.instrumented::<R, _, _>("update", |store| store.update_impl(record))
    }

    /// Apply field overrides to `record`, then [`update`](Self::update) it.
    ///
    /// The overrides are applied all or nothing: if one of them is rejected,
    /// the fields already set are restored and no statement runs. Once every
    /// override is applied the record keeps them, even when no row matches.
    ///
    /// # Errors
    ///
    /// `NoKey` if `R` declares no key (checked before any field is set),
    /// `UnknownField` / `ValueConversion` from the overrides.
    pub fn update_with<R, I, K, V>(&mut self, record: &mut R, changes: I) -> Result<bool>
    where
        R: Record,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.instrumented::<R, _, _>("update_with", |store| {
            let meta = meta_of::<R>()?;
            meta.require_key()?;
            apply_overrides(&meta, record, changes)?;
            store.update_impl(record)
        })
    }

    /// Insert `record`, or overwrite the row with its key if one exists.
    ///
    /// Runs as a single `INSERT ... ON CONFLICT DO UPDATE` statement, so no
    /// other write can land between the existence check and the write.
    ///
    /// # Errors
    ///
    /// `NoKey` if `R` declares no key, raised before the database is touched.
    pub fn upsert<R: Record>(&mut self, record: &R) -> Result<bool> {
        self.instrumented::<R, _, _>("upsert", |store| {
            meta_of::<R>()?.require_key()?;
            let meta = store.prepare_impl::<R>()?;
            let statement = statements::upsert(&meta, meta.values(record)?)?;
            let affected = store.execute("upsert", &meta, &statement)?;
            Ok(affected == 1)
        })
    }

    /// Fetch the record with the given key, or `None` if no row matches.
    ///
    /// # Errors
    ///
    /// `NoKey` if `R` declares no key, `ValueConversion` if a stored value
    /// does not fit its field.
    pub fn get<R: Record>(&mut self, key: impl Into<Value>) -> Result<Option<R>> {
        let key = key.into();
        self.instrumented::<R, _, _>("get", |store| {
            meta_of::<R>()?.require_key()?;
            let meta = store.prepare_impl::<R>()?;
            let statement = statements::select_by_key(&meta, key)?;
            let row = store.query_row(&meta, &statement)?;
            row.map(R::from_row).transpose()
        })
    }

    /// Number of rows in `R`'s table
    ///
    /// # Errors
    ///
    /// Metadata errors for `R`, `Persistence` from the engine.
    pub fn count<R: Record>(&mut self) -> Result<u64> {
        self.instrumented::<R, _, _>("count", |store| {
            let meta = store.prepare_impl::<R>()?;
            let statement = statements::count(&meta);
            let conn = store.connection()?;
            let n: i64 = conn
                .query_row(&statement.sql, [], |row| row.get(0))
                .map_err(|e| from_rusqlite("count", meta.table(), e))?;
            Ok(n.max(0) as u64)
        })
    }

    /// Close the connection, reporting any error the engine raises on close.
    ///
    /// A Store that never opened its connection closes trivially.
    ///
    /// # Errors
    ///
    /// `Persistence` if the engine fails to close the connection.
    pub fn close(mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| persistence("close", e)),
            None => Ok(()),
        }
    }

    fn prepare_impl<R: Record>(&mut self) -> Result<Arc<TableMeta>> {
        let meta = meta_of::<R>()?;
        let id = TypeId::of::<R>();
        if !self.prepared.contains(&id) {
            self.execute("prepare", &meta, &statements::create_table(&meta))?;
            self.prepared.insert(id);
        }
        Ok(meta)
    }

    fn update_impl<R: Record>(&mut self, record: &R) -> Result<bool> {
        meta_of::<R>()?.require_key()?;
        let meta = self.prepare_impl::<R>()?;
        let statement = statements::update(&meta, meta.values(record)?)?;
        let affected = self.execute("update", &meta, &statement)?;
        Ok(affected == 1)
    }

    fn connection(&mut self) -> Result<&Connection> {
        if self.conn.is_none() {
            self.conn = Some(db::connect(&self.config)?);
        }
        self.conn.as_ref().ok_or_else(|| RowbindError::Internal {
            message: "connection missing after open".to_string(),
        })
    }

    fn execute(&mut self, op: &str, meta: &TableMeta, statement: &Statement) -> Result<usize> {
        tracing::debug!(op, table = meta.table(), sql = %statement.sql, params = statement.params.len(), "execute");
        let conn = self.connection()?;
        let affected = conn
            .execute(
                &statement.sql,
                params_from_iter(statement.params.iter().map(convert::to_sql)),
            )
            .map_err(|e| from_rusqlite(op, meta.table(), e))?;
        tracing::debug!(op, table = meta.table(), rows_affected = affected, "executed");
        Ok(affected)
    }

    fn query_row(&mut self, meta: &TableMeta, statement: &Statement) -> Result<Option<Row>> {
        tracing::debug!(op = "get", table = meta.table(), sql = %statement.sql, "query");
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(&statement.sql)
            .map_err(|e| from_rusqlite("get", meta.table(), e))?;
        let row = stmt
            .query_row(
                params_from_iter(statement.params.iter().map(convert::to_sql)),
                |sql_row| {
                    let mut row = Row::new();
                    for (i, column) in meta.fields().iter().enumerate() {
                        let raw: rusqlite::types::Value = sql_row.get(i)?;
                        row.push(column.name.clone(), convert::from_sql(column, raw));
                    }
                    Ok(row)
                },
            )
            .optional()
            .map_err(|e| from_rusqlite("get", meta.table(), e))?;
        Ok(row)
    }

    fn instrumented<R, T, F>(&mut self, op: &'static str, f: F) -> Result<T>
    where
        R: Record,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let record_type = std::any::type_name::<R>();
        log_op_start!(op, record_type = record_type);
        let start = Instant::now();

        match f(self) {
            Ok(value) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    record_type = record_type
                );
                Ok(value)
            }
            Err(e) => {
                log_op_error!(
                    op,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    record_type = record_type
                );
                Err(e)
            }
        }
    }
}

/// Set each override on `record`, restoring the touched fields if any fails
fn apply_overrides<R, I, K, V>(meta: &TableMeta, record: &mut R, changes: I) -> Result<()>
where
    R: Record,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    let mut applied: Vec<(String, Value)> = Vec::new();
    for (name, value) in changes {
        let name = name.as_ref();
        let outcome = record
            .field(name)
            .ok_or_else(|| RowbindError::UnknownField {
                type_name: meta.type_name().to_string(),
                field: name.to_string(),
            })
            .and_then(|previous| {
                record.set_field(name, value.into())?;
                Ok(previous)
            });
        match outcome {
            Ok(previous) => applied.push((name.to_string(), previous)),
            Err(e) => {
                for (name, previous) in applied.into_iter().rev() {
                    let _ = record.set_field(&name, previous);
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .field("prepared_types", &self.prepared.len())
            .finish()
    }
}
