//! # mallard-core
//!
//! The host contract a mallard dialect adapter is written against:
//! field/record descriptors, the bound-value model, the session handle with
//! its callback registry, the [`Dialector`] trait and the generic migrator.
//!
//! The crate deliberately stops at the adapter seam: there is no query
//! planner and no model layer here. A backend crate (such as
//! `mallard-duckdb`) supplies a [`Dialector`]; opening a [`Session`] with it
//! wires the dialect's callbacks and connection into the handle:
//!
//! ```rust,ignore
//! use mallard_core::Session;
//! use mallard_duckdb::DuckDbDialector;
//!
//! let session = Session::open(DuckDbDialector::open(":memory:"))?;
//! let mut user = User::default();
//! session.create(&mut user)?;
//! ```

pub mod callbacks;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod migrator;
pub mod model;
pub mod schema;
pub mod session;
pub mod value;

pub use callbacks::{Callbacks, CreateContext, RowContext, RowDestination, RowShape};
pub use connection::ConnPool;
pub use dialect::Dialector;
pub use error::{OrmError, Result};
pub use migrator::Migrator;
pub use model::{GeneratedKey, KeyError, Record};
pub use schema::{DefaultValue, FieldDescriptor, FieldKind, TableDescriptor};
pub use session::{Session, SessionHandle};
pub use value::{IntoValue, Value};
