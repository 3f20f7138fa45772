//! The DuckDB dialector.

use std::sync::Arc;

use mallard_core::callbacks::CallbackError;
use mallard_core::connection::ConnPool;
use mallard_core::dialect::Dialector;
use mallard_core::error::Result;
use mallard_core::migrator::Migrator;
use mallard_core::schema::{DefaultValue, FieldDescriptor};
use mallard_core::session::{Session, SessionHandle};
use mallard_core::value::Value;
use tracing::debug;

use crate::migrator::DuckDbMigrator;
use crate::pool::DuckDbPool;
use crate::row::RowQueryStrategy;
use crate::{create, quote, row, types};

/// Instance setting that marks a handle whose callbacks are registered.
const CALLBACKS_REGISTERED: &str = "mallard-duckdb:callbacks_registered";

/// Controls whether the row-query callback workaround is installed.
///
/// The host's stock row handler leaves the query destination unassigned,
/// breaking raw row queries. See [`RowQueryStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowCallbackWorkaround {
    /// Always install the corrected handler.
    Enable,
    /// Keep the host's stock handler.
    Disable,
    /// Decide per host version. Currently resolves to the corrected
    /// handler until a fixed host ships.
    #[default]
    Auto,
}

impl RowCallbackWorkaround {
    pub(crate) const fn strategy(self) -> RowQueryStrategy {
        match self {
            Self::Enable | Self::Auto => RowQueryStrategy::Patched,
            Self::Disable => RowQueryStrategy::Native,
        }
    }
}

/// Dialector configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Data source name; empty or `:memory:` opens an in-memory database.
    pub dsn: String,
    /// Pre-established pool; when set, `dsn` is ignored.
    pub conn: Option<Arc<dyn ConnPool>>,
    /// Declared length for strings whose descriptor carries none. Zero or
    /// out-of-range values fall back to 256.
    pub default_string_size: u32,
    /// Row-query workaround toggle.
    pub row_callback_workaround: RowCallbackWorkaround,
}

/// The DuckDB dialect adapter.
#[derive(Debug, Clone, Default)]
pub struct DuckDbDialector {
    config: Config,
}

impl DuckDbDialector {
    /// Creates a dialector for the given data source name with default
    /// configuration.
    #[must_use]
    pub fn open(dsn: impl Into<String>) -> Self {
        Self {
            config: Config {
                dsn: dsn.into(),
                ..Config::default()
            },
        }
    }

    /// Creates a dialector from a full configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a dialector for `dsn`, taking the remaining settings from
    /// `config`.
    #[must_use]
    pub fn open_with_config(dsn: impl Into<String>, mut config: Config) -> Self {
        config.dsn = dsn.into();
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    fn acquire(&self) -> Result<Arc<dyn ConnPool>> {
        if let Some(pool) = &self.config.conn {
            return Ok(Arc::clone(pool));
        }
        Ok(Arc::new(DuckDbPool::open(&self.config.dsn)?))
    }
}

fn note_duplicate(result: std::result::Result<(), CallbackError>) {
    if let Err(CallbackError::Duplicated(name)) = result {
        debug!(callback = %name, "already registered, skipping");
    }
}

impl Dialector for DuckDbDialector {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn initialize(&self, handle: &mut SessionHandle) -> Result<()> {
        if !handle.instance_get(CALLBACKS_REGISTERED) {
            note_duplicate(
                handle
                    .callbacks_mut()
                    .replace_create("duckdb:create", create::create_callback),
            );

            if self.config.row_callback_workaround.strategy() == RowQueryStrategy::Patched {
                note_duplicate(
                    handle
                        .callbacks_mut()
                        .replace_row("duckdb:row", row::row_query_callback),
                );
                debug!("row-query workaround installed");
            } else {
                debug!("row-query workaround disabled, keeping stock handler");
            }

            handle.instance_set(CALLBACKS_REGISTERED, true);
        }

        handle.set_conn(self.acquire()?);
        Ok(())
    }

    fn migrator<'s>(&self, session: &'s Session) -> Box<dyn Migrator + 's> {
        Box::new(DuckDbMigrator::new(session))
    }

    fn type_name_of(&self, field: &FieldDescriptor) -> String {
        types::type_name_for(field, self.config.default_string_size)
    }

    fn default_value_of(&self, field: &FieldDescriptor) -> Option<String> {
        field.default.as_ref().map(DefaultValue::to_sql)
    }

    fn quote_to(&self, buf: &mut String, raw: &str) {
        quote::quote_to(buf, raw);
    }

    fn explain(&self, sql: &str, vars: &[Value]) -> String {
        let mut out = String::with_capacity(sql.len());
        let mut vars_iter = vars.iter();
        let mut parts = sql.split('?');
        if let Some(head) = parts.next() {
            out.push_str(head);
        }
        for part in parts {
            let rendered = vars_iter
                .next()
                .map_or_else(|| String::from("?"), Value::to_sql_inline);
            out.push_str(&rendered);
            out.push_str(part);
        }
        out
    }

    fn savepoint(&self, session: &Session, name: &str) -> Result<()> {
        session
            .execute(&format!("SAVEPOINT {name}"), &[])
            .map(|_| ())
    }

    fn rollback_to(&self, session: &Session, name: &str) -> Result<()> {
        session
            .execute(&format!("ROLLBACK TO SAVEPOINT {name}"), &[])
            .map(|_| ())
    }
}
