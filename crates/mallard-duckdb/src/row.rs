//! The row-query callback.
//!
//! The host's stock row handler executes the query but leaves the
//! destination unassigned, so raw queries surface a destination error. The
//! handler here assigns the destination for both single-row and multi-row
//! shapes. Installation is controlled through
//! [`Config::row_callback_workaround`](crate::Config).

use mallard_core::callbacks::{RowContext, RowDestination, RowShape};
use mallard_core::connection::ConnPool;

/// Which row handler a session gets at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowQueryStrategy {
    /// Keep the host's stock handler.
    Native,
    /// Install the handler that assigns the destination.
    Patched,
}

pub fn row_query_callback(conn: &dyn ConnPool, ctx: &mut RowContext<'_>) {
    if ctx.error.is_some() || ctx.sql.is_empty() {
        return;
    }
    match ctx.shape {
        RowShape::Single => match conn.query_row(ctx.sql, ctx.vars) {
            Ok(row) => ctx.dest = Some(RowDestination::Row(row)),
            Err(err) => ctx.error = Some(err),
        },
        RowShape::Multi => match conn.query(ctx.sql, ctx.vars) {
            Ok(rows) => ctx.dest = Some(RowDestination::Rows(rows)),
            Err(err) => ctx.error = Some(err),
        },
    }
}
