//! The pluggable backend contract.
//!
//! Different engines have different SQL syntax, type names and behavioral
//! quirks. A [`Dialector`] supplies all dialect-specific decisions to the
//! session: type mapping, identifier quoting, bind variables, migrations,
//! savepoints, and the statement callbacks it installs at initialization.

use crate::error::Result;
use crate::migrator::Migrator;
use crate::schema::FieldDescriptor;
use crate::session::{Session, SessionHandle};
use crate::value::Value;

/// Trait for dialect-specific behavior.
pub trait Dialector {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Prepares a session handle: installs callbacks and acquires the
    /// connection.
    ///
    /// Must be safe to call more than once against the same handle.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be opened or a
    /// non-duplicate callback registration fails.
    fn initialize(&self, handle: &mut SessionHandle) -> Result<()>;

    /// Returns the migrator for this dialect.
    fn migrator<'s>(&self, session: &'s Session) -> Box<dyn Migrator + 's>;

    /// Maps a field descriptor to the engine's type name.
    fn type_name_of(&self, field: &FieldDescriptor) -> String;

    /// Renders a field's default value clause, if it declares one.
    fn default_value_of(&self, field: &FieldDescriptor) -> Option<String>;

    /// Writes the bind variable for the given 1-based position.
    fn bind_var(&self, buf: &mut String, _position: usize) {
        buf.push('?');
    }

    /// Writes the quoted form of `raw` to `buf`.
    fn quote_to(&self, buf: &mut String, raw: &str);

    /// Returns the quoted form of `raw`.
    fn quote(&self, raw: &str) -> String {
        let mut buf = String::with_capacity(raw.len() + 2);
        self.quote_to(&mut buf, raw);
        buf
    }

    /// Renders a statement with its bound values inlined, for logging.
    fn explain(&self, sql: &str, vars: &[Value]) -> String;

    /// Creates a savepoint with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn savepoint(&self, session: &Session, name: &str) -> Result<()>;

    /// Rolls back to the given savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn rollback_to(&self, session: &Session, name: &str) -> Result<()>;
}
