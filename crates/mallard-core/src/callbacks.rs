//! Statement callbacks.
//!
//! A session carries exactly one create handler and one row handler.
//! Dialectors install their own implementations with [`Callbacks::replace_create`]
//! and [`Callbacks::replace_row`] during initialization; registration names
//! are remembered so a second registration under the same name surfaces as
//! [`CallbackError::Duplicated`] (which initializers typically swallow).

use std::collections::HashSet;

use crate::connection::ConnPool;
use crate::error::OrmError;
use crate::model::Record;
use crate::schema::TableDescriptor;
use crate::value::Value;

/// Errors raised by callback registration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallbackError {
    /// A callback was already registered under this name.
    #[error("duplicated callback `{0}`")]
    Duplicated(String),
}

/// Operation context for a create statement.
pub struct CreateContext<'a> {
    /// Parsed metadata for the record being inserted.
    pub descriptor: TableDescriptor,
    /// The record being inserted; the create handler reads column values
    /// from it and writes the generated key back into it.
    pub record: &'a mut dyn Record,
    /// Rows written, set by the handler on success.
    pub rows_affected: u64,
    /// Error slot; a set error stops the operation.
    pub error: Option<OrmError>,
}

/// Whether a raw query expects one row or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// `query_row` semantics.
    Single,
    /// `query_rows` semantics.
    Multi,
}

/// Destination assigned by the row handler.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDestination {
    /// Single-row result; `None` when the query matched nothing.
    Row(Option<Vec<Value>>),
    /// Multi-row result.
    Rows(Vec<Vec<Value>>),
}

/// Operation context for a raw row query.
pub struct RowContext<'a> {
    /// Statement text.
    pub sql: &'a str,
    /// Bound parameters.
    pub vars: &'a [Value],
    /// Expected result shape.
    pub shape: RowShape,
    /// Destination slot the handler is expected to assign.
    pub dest: Option<RowDestination>,
    /// Error slot; a set error stops the operation.
    pub error: Option<OrmError>,
}

type CreateFn = Box<dyn Fn(&dyn ConnPool, &mut CreateContext<'_>) + Send + Sync>;
type RowFn = Box<dyn Fn(&dyn ConnPool, &mut RowContext<'_>) + Send + Sync>;

/// The callback registry of one session handle.
pub struct Callbacks {
    create: CreateFn,
    row: RowFn,
    names: HashSet<String>,
}

impl Callbacks {
    pub(crate) fn new() -> Self {
        Self {
            create: Box::new(stock_create),
            row: Box::new(stock_row),
            names: HashSet::new(),
        }
    }

    /// Replaces the create handler.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::Duplicated`] when `name` was already used.
    pub fn replace_create<F>(&mut self, name: &str, handler: F) -> Result<(), CallbackError>
    where
        F: Fn(&dyn ConnPool, &mut CreateContext<'_>) + Send + Sync + 'static,
    {
        self.claim(name)?;
        self.create = Box::new(handler);
        Ok(())
    }

    /// Replaces the row handler.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::Duplicated`] when `name` was already used.
    pub fn replace_row<F>(&mut self, name: &str, handler: F) -> Result<(), CallbackError>
    where
        F: Fn(&dyn ConnPool, &mut RowContext<'_>) + Send + Sync + 'static,
    {
        self.claim(name)?;
        self.row = Box::new(handler);
        Ok(())
    }

    fn claim(&mut self, name: &str) -> Result<(), CallbackError> {
        if !self.names.insert(String::from(name)) {
            return Err(CallbackError::Duplicated(String::from(name)));
        }
        Ok(())
    }

    pub(crate) fn run_create(&self, conn: &dyn ConnPool, ctx: &mut CreateContext<'_>) {
        (self.create)(conn, ctx);
    }

    pub(crate) fn run_row(&self, conn: &dyn ConnPool, ctx: &mut RowContext<'_>) {
        (self.row)(conn, ctx);
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

/// The stock create handler generates no INSERT for pluggable backends;
/// dialectors replace it during initialization.
fn stock_create(_conn: &dyn ConnPool, ctx: &mut CreateContext<'_>) {
    ctx.error = Some(OrmError::Unsupported("create"));
}

/// The stock row handler executes the query but never assigns the
/// destination, so callers observe `OrmError::RowDestination` unless a
/// dialector has installed a handler that assigns it.
fn stock_row(conn: &dyn ConnPool, ctx: &mut RowContext<'_>) {
    if ctx.error.is_some() || ctx.sql.is_empty() {
        return;
    }
    let outcome = match ctx.shape {
        RowShape::Single => conn.query_row(ctx.sql, ctx.vars).map(|_| ()),
        RowShape::Multi => conn.query(ctx.sql, ctx.vars).map(|_| ()),
    };
    if let Err(err) = outcome {
        ctx.error = Some(err);
    }
}
