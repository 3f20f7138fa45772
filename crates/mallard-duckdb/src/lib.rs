//! # mallard-duckdb
//!
//! DuckDB dialect adapter for `mallard-core`.
//!
//! How DuckDB differs from the other dialects:
//!
//! - No `AUTOINCREMENT` attribute: the migrator backs each auto-increment
//!   column with a sequence named `seq_<table>_<column>` and a
//!   `nextval(...)` column default.
//! - No `last_insert_id`: the create callback appends `RETURNING` for the
//!   auto-increment column and reads the generated key back.
//! - Unsigned column types exist but cannot participate in foreign keys
//!   against signed types, so unsigned fields map to signed column types.
//! - Nullable timestamps and list values need rewriting at the driver
//!   boundary before binding.
//! - The host's stock row handler leaves raw query destinations
//!   unassigned; a corrected handler is installed by default (see
//!   [`RowCallbackWorkaround`]).
//!
//! ```rust,ignore
//! use mallard_core::Session;
//! use mallard_duckdb::DuckDbDialector;
//!
//! let session = Session::open(DuckDbDialector::open(":memory:"))?;
//! session.migrator().create_table(&user.descriptor())?;
//! session.create(&mut user)?;
//! ```

pub mod arrays;
mod convert;
mod create;
mod dialector;
mod migrator;
mod pool;
mod quote;
mod row;
mod types;

pub use arrays::{FloatArray, IntArray, StringArray};
pub use dialector::{Config, DuckDbDialector, RowCallbackWorkaround};
pub use migrator::DuckDbMigrator;
pub use pool::DuckDbPool;
pub use row::RowQueryStrategy;
