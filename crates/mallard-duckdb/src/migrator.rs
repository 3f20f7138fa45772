//! The DuckDB migrator.
//!
//! DuckDB has no `AUTOINCREMENT` column attribute, so auto-increment
//! columns are backed by sequences: `create_table` provisions one sequence
//! per auto-increment column and points the column default at
//! `nextval(...)` before delegating to the generic renderer. Everything
//! else inherits the generic implementation.

use mallard_core::error::Result;
use mallard_core::migrator::{create_table_sql, Migrator};
use mallard_core::schema::{DefaultValue, TableDescriptor};
use mallard_core::session::Session;
use tracing::debug;

use crate::quote;

/// Migrator for DuckDB sessions.
pub struct DuckDbMigrator<'s> {
    session: &'s Session,
}

impl<'s> DuckDbMigrator<'s> {
    pub(crate) const fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

fn sequence_name(table: &str, column: &str) -> String {
    format!("seq_{table}_{column}")
}

impl Migrator for DuckDbMigrator<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn create_table(&self, table: &TableDescriptor) -> Result<()> {
        let mut table = table.clone();
        for field in &mut table.fields {
            if !field.auto_increment {
                continue;
            }
            let seq = sequence_name(&table.table, &field.column);
            debug!(sequence = %seq, "provisioning key sequence");
            self.session.execute(
                &format!("CREATE SEQUENCE IF NOT EXISTS {} START 1", quote::quote(&seq)),
                &[],
            )?;
            if field.default.is_none() {
                field.default = Some(DefaultValue::Expression(format!("nextval('{seq}')")));
            }
        }

        let sql = create_table_sql(self.session.dialector(), &table);
        debug!(table = %table.table, "creating table");
        self.session.execute(&sql, &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_name_format() {
        assert_eq!(sequence_name("users", "id"), "seq_users_id");
    }
}
