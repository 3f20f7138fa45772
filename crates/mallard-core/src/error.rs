//! Error types shared by the session and its dialect adapters.

use crate::callbacks::CallbackError;

/// Errors that can occur during session operations.
#[derive(Debug, thiserror::Error)]
pub enum OrmError {
    /// Opening the underlying database connection failed.
    #[error("failed to open database connection: {0}")]
    ConnectionOpen(String),

    /// The underlying driver reported an error while executing a statement.
    #[error("driver error: {0}")]
    Driver(String),

    /// An INSERT was requested for a record with no insertable fields.
    #[error("no fields to insert")]
    EmptyInsert,

    /// Callback registration failed.
    #[error("callback error: {0}")]
    Callback(#[from] CallbackError),

    /// The row callback finished without assigning the statement destination.
    ///
    /// The stock row handler never assigns it; dialectors are expected to
    /// install one that does.
    #[error("row destination was not assigned by the row callback")]
    RowDestination,

    /// The session has no active connection.
    #[error("session has no active connection")]
    NoConnection,

    /// A column was referenced that the table descriptor does not declare.
    #[error("column `{column}` is not declared on table `{table}`")]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// The operation is not supported without a dialect-installed handler.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, OrmError>;
