//! The driver boundary.
//!
//! A [`ConnPool`] is the session's only way to reach the database engine.
//! Dialect adapters implement it over their driver and apply any bound
//! parameter conversion immediately before binding, never earlier.

use crate::error::Result;
use crate::value::Value;

/// A pooled connection to the database engine.
///
/// All calls execute synchronously on the calling thread; cancellation and
/// timeouts are whatever the underlying engine provides.
pub trait ConnPool: Send + Sync {
    /// Executes a statement, returning the engine-reported affected-row
    /// count.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Executes a query expected to yield at most one row.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn query_row(&self, sql: &str, params: &[Value]) -> Result<Option<Vec<Value>>>;

    /// Executes a query, returning all rows.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>>;
}

impl std::fmt::Debug for dyn ConnPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConnPool")
    }
}
