//! Sessions and session handles.
//!
//! A [`SessionHandle`] is the mutable state a dialector initializes: the
//! connection slot, the callback registry and a per-handle side-table of
//! instance settings (used, among other things, to make repeated
//! initialization idempotent). A [`Session`] pairs one handle with the
//! dialector that initialized it and exposes the operation surface.

use std::collections::HashMap;
use std::sync::Arc;

use crate::callbacks::{Callbacks, CreateContext, RowContext, RowDestination, RowShape};
use crate::connection::ConnPool;
use crate::dialect::Dialector;
use crate::error::{OrmError, Result};
use crate::migrator::Migrator;
use crate::model::Record;
use crate::value::Value;

/// The live, dialector-facing state of one session.
#[derive(Debug, Default)]
pub struct SessionHandle {
    conn: Option<Arc<dyn ConnPool>>,
    callbacks: Callbacks,
    settings: HashMap<String, bool>,
}

impl SessionHandle {
    /// Creates an empty handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the connection pool.
    pub fn set_conn(&mut self, conn: Arc<dyn ConnPool>) {
        self.conn = Some(conn);
    }

    /// Returns the callback registry.
    #[must_use]
    pub const fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Returns the callback registry mutably.
    pub const fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Reads a boolean instance setting; unset keys read as `false`.
    #[must_use]
    pub fn instance_get(&self, key: &str) -> bool {
        self.settings.get(key).copied().unwrap_or(false)
    }

    /// Writes a boolean instance setting.
    pub fn instance_set(&mut self, key: &str, value: bool) {
        self.settings.insert(String::from(key), value);
    }

    fn connection(&self) -> Result<Arc<dyn ConnPool>> {
        self.conn.clone().ok_or(OrmError::NoConnection)
    }
}

/// A session: one initialized handle plus its dialector.
pub struct Session {
    handle: SessionHandle,
    dialector: Box<dyn Dialector>,
}

impl Session {
    /// Opens a session by initializing a fresh handle with `dialector`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by [`Dialector::initialize`].
    pub fn open<D: Dialector + 'static>(dialector: D) -> Result<Self> {
        let mut handle = SessionHandle::new();
        dialector.initialize(&mut handle)?;
        Ok(Self {
            handle,
            dialector: Box::new(dialector),
        })
    }

    /// Returns the session handle.
    #[must_use]
    pub const fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Returns the session handle mutably.
    pub const fn handle_mut(&mut self) -> &mut SessionHandle {
        &mut self.handle
    }

    /// Returns the dialector driving this session.
    #[must_use]
    pub fn dialector(&self) -> &dyn Dialector {
        self.dialector.as_ref()
    }

    /// Returns the connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::NoConnection`] when initialization installed no
    /// pool.
    pub fn connection(&self) -> Result<Arc<dyn ConnPool>> {
        self.handle.connection()
    }

    /// Executes a statement directly, returning the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.connection()?.execute(sql, params)
    }

    /// Inserts a record through the create callback.
    ///
    /// Returns the affected-row count on success. When the record has an
    /// auto-increment field, the generated key is written back into it on
    /// a best-effort basis.
    ///
    /// # Errors
    ///
    /// Returns the error recorded on the operation context, if any.
    pub fn create(&self, record: &mut dyn Record) -> Result<u64> {
        let conn = self.connection()?;
        let descriptor = record.descriptor();
        let mut ctx = CreateContext {
            descriptor,
            record,
            rows_affected: 0,
            error: None,
        };
        self.handle.callbacks.run_create(conn.as_ref(), &mut ctx);
        match ctx.error {
            Some(err) => Err(err),
            None => Ok(ctx.rows_affected),
        }
    }

    /// Runs a raw query through the row callback with single-row shape.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::RowDestination`] when the installed row handler
    /// left the destination unassigned, or any execution error.
    pub fn query_row(&self, sql: &str, vars: &[Value]) -> Result<Option<Vec<Value>>> {
        let conn = self.connection()?;
        let mut ctx = RowContext {
            sql,
            vars,
            shape: RowShape::Single,
            dest: None,
            error: None,
        };
        self.handle.callbacks.run_row(conn.as_ref(), &mut ctx);
        if let Some(err) = ctx.error {
            return Err(err);
        }
        match ctx.dest {
            Some(RowDestination::Row(row)) => Ok(row),
            Some(RowDestination::Rows(mut many)) => {
                if many.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(many.remove(0)))
                }
            }
            None => Err(OrmError::RowDestination),
        }
    }

    /// Runs a raw query through the row callback with multi-row shape.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::RowDestination`] when the installed row handler
    /// left the destination unassigned, or any execution error.
    pub fn query_rows(&self, sql: &str, vars: &[Value]) -> Result<Vec<Vec<Value>>> {
        let conn = self.connection()?;
        let mut ctx = RowContext {
            sql,
            vars,
            shape: RowShape::Multi,
            dest: None,
            error: None,
        };
        self.handle.callbacks.run_row(conn.as_ref(), &mut ctx);
        if let Some(err) = ctx.error {
            return Err(err);
        }
        match ctx.dest {
            Some(RowDestination::Rows(rows)) => Ok(rows),
            Some(RowDestination::Row(Some(single))) => Ok(vec![single]),
            Some(RowDestination::Row(None)) => Ok(Vec::new()),
            None => Err(OrmError::RowDestination),
        }
    }

    /// Returns the dialect's migrator bound to this session.
    #[must_use]
    pub fn migrator(&self) -> Box<dyn Migrator + '_> {
        self.dialector.migrator(self)
    }

    /// Creates a savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    pub fn savepoint(&self, name: &str) -> Result<()> {
        self.dialector.savepoint(self, name)
    }

    /// Rolls back to a savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    pub fn rollback_to(&self, name: &str) -> Result<()> {
        self.dialector.rollback_to(self, name)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("dialect", &self.dialector.name())
            .finish_non_exhaustive()
    }
}
