//! The generic migrator.
//!
//! Schema operations are provided as default methods that render standard
//! SQL through the session's dialector and execute it. A dialect adapter
//! implements [`Migrator`], inheriting everything and overriding only the
//! operations its engine does differently. The SQL renderers are free
//! functions so overrides can delegate back to the generic rendering.

use tracing::debug;

use crate::dialect::Dialector;
use crate::error::{OrmError, Result};
use crate::schema::{FieldDescriptor, TableDescriptor};
use crate::session::Session;
use crate::value::Value;

/// Renders a column definition through the dialector.
#[must_use]
pub fn column_definition(dialector: &dyn Dialector, field: &FieldDescriptor) -> String {
    let mut sql = format!(
        "{} {}",
        dialector.quote(&field.column),
        dialector.type_name_of(field)
    );

    if field.primary_key {
        sql.push_str(" PRIMARY KEY");
    } else {
        if field.not_null {
            sql.push_str(" NOT NULL");
        }
        if field.unique {
            sql.push_str(" UNIQUE");
        }
    }

    if let Some(default) = dialector.default_value_of(field) {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default);
    }

    sql
}

/// Renders a `CREATE TABLE IF NOT EXISTS` statement through the dialector.
#[must_use]
pub fn create_table_sql(dialector: &dyn Dialector, table: &TableDescriptor) -> String {
    let mut sql = String::from("CREATE TABLE IF NOT EXISTS ");
    sql.push_str(&dialector.quote(&table.table));
    sql.push_str(" (\n");

    let column_defs: Vec<String> = table
        .fields
        .iter()
        .map(|f| format!("    {}", column_definition(dialector, f)))
        .collect();
    sql.push_str(&column_defs.join(",\n"));

    sql.push_str("\n)");
    sql
}

fn scalar_count(session: &Session, sql: &str, params: &[Value]) -> Result<bool> {
    let row = session.connection()?.query_row(sql, params)?;
    let count = match row.as_ref().and_then(|r| r.first()) {
        Some(Value::Int(n)) => *n,
        Some(Value::UInt(n)) => i64::try_from(*n).unwrap_or(i64::MAX),
        _ => 0,
    };
    Ok(count > 0)
}

/// Schema operations over one session.
pub trait Migrator {
    /// Returns the session this migrator operates on.
    fn session(&self) -> &Session;

    /// Returns whether the table exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the probe.
    fn has_table(&self, table: &str) -> Result<bool> {
        scalar_count(
            self.session(),
            "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
            &[Value::Text(String::from(table))],
        )
    }

    /// Creates the table described by `table` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn create_table(&self, table: &TableDescriptor) -> Result<()> {
        let sql = create_table_sql(self.session().dialector(), table);
        debug!(table = %table.table, "creating table");
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Drops the table if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn drop_table(&self, table: &str) -> Result<()> {
        let d = self.session().dialector();
        let sql = format!("DROP TABLE IF EXISTS {}", d.quote(table));
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Renames a table.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn rename_table(&self, old: &str, new: &str) -> Result<()> {
        let d = self.session().dialector();
        let sql = format!("ALTER TABLE {} RENAME TO {}", d.quote(old), d.quote(new));
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Returns whether the column exists on the table.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the probe.
    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        scalar_count(
            self.session(),
            "SELECT count(*) FROM information_schema.columns \
             WHERE table_name = ? AND column_name = ?",
            &[
                Value::Text(String::from(table)),
                Value::Text(String::from(column)),
            ],
        )
    }

    /// Adds the named column from the descriptor to the table.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::UnknownColumn`] when the descriptor does not
    /// declare `column`, or any execution error.
    fn add_column(&self, table: &TableDescriptor, column: &str) -> Result<()> {
        let field = table
            .field(column)
            .ok_or_else(|| OrmError::UnknownColumn {
                table: table.table.clone(),
                column: String::from(column),
            })?;
        let d = self.session().dialector();
        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {}",
            d.quote(&table.table),
            column_definition(d, field)
        );
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Drops a column.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        let d = self.session().dialector();
        let sql = format!(
            "ALTER TABLE {} DROP COLUMN {}",
            d.quote(table),
            d.quote(column)
        );
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Renames a column.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn rename_column(&self, table: &str, old: &str, new: &str) -> Result<()> {
        let d = self.session().dialector();
        let sql = format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            d.quote(table),
            d.quote(old),
            d.quote(new)
        );
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Creates an index if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn create_index(&self, table: &str, name: &str, columns: &[&str], unique: bool) -> Result<()> {
        let d = self.session().dialector();
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX IF NOT EXISTS ");
        sql.push_str(&d.quote(name));
        sql.push_str(" ON ");
        sql.push_str(&d.quote(table));
        sql.push_str(" (");
        let cols: Vec<String> = columns.iter().map(|c| d.quote(c)).collect();
        sql.push_str(&cols.join(", "));
        sql.push(')');
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Drops an index if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the statement.
    fn drop_index(&self, name: &str) -> Result<()> {
        let d = self.session().dialector();
        let sql = format!("DROP INDEX IF EXISTS {}", d.quote(name));
        self.session().execute(&sql, &[])?;
        Ok(())
    }

    /// Returns whether the named constraint exists on the table.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the probe.
    fn has_constraint(&self, table: &str, name: &str) -> Result<bool> {
        scalar_count(
            self.session(),
            "SELECT count(*) FROM information_schema.table_constraints \
             WHERE table_name = ? AND constraint_name = ?",
            &[
                Value::Text(String::from(table)),
                Value::Text(String::from(name)),
            ],
        )
    }
}
