//! rowbind store - record persistence on embedded SQLite
//!
//! Provides:
//! - `Store`: lazily opened connection plus create/drop/truncate, insert,
//!   update, upsert and get-by-key over any `Record` type
//! - `StoreConfig`: explicit file or in-memory target, with pragmas
//! - Marshalling between core values and SQLite values
//!
//! ```
//! use rowbind_store::{record, Store};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct WebPage {
//!         pub url: String,
//!         pub visits: i64,
//!     }
//!     key = url
//! }
//!
//! let mut store = Store::in_memory();
//! let page = WebPage { url: "http://a.com/".into(), visits: 1 };
//! store.insert(&page).unwrap();
//! assert_eq!(store.get::<WebPage>("http://a.com/").unwrap(), Some(page));
//! ```

pub mod config;
pub mod convert;
pub mod db;
pub mod errors;
pub mod store;

pub use config::{JournalMode, StoreConfig, Target};
pub use errors::{Result, RowbindError};
pub use store::Store;

// Re-export the mapping surface so callers need only this crate
pub use rowbind_core::{meta_for, meta_of, record, Declaration, Record, Row, TableMeta, Value};
