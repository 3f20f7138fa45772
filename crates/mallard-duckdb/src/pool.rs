//! The DuckDB connection pool.
//!
//! `duckdb` connections are not `Sync`, so the pool serializes statement
//! execution through a mutex, the same discipline a shared handle gets from
//! a database/sql-style pool. Parameter conversion happens here, right
//! before binding.

use std::sync::{Mutex, MutexGuard};

use chrono::DateTime;
use duckdb::types::{TimeUnit, ToSqlOutput, Value as DriverValue};
use duckdb::{params_from_iter, Connection, ToSql};
use tracing::debug;

use mallard_core::connection::ConnPool;
use mallard_core::error::{OrmError, Result};
use mallard_core::value::Value;

use crate::convert;

/// A mutex-guarded DuckDB connection implementing [`ConnPool`].
pub struct DuckDbPool {
    conn: Mutex<Connection>,
}

impl DuckDbPool {
    /// Opens a database at `dsn`. An empty string or `:memory:` opens an
    /// in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::ConnectionOpen`] when the engine cannot open the
    /// database.
    pub fn open(dsn: &str) -> Result<Self> {
        let conn = if dsn.is_empty() || dsn == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(dsn)
        }
        .map_err(|err| OrmError::ConnectionOpen(err.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already opened connection.
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| OrmError::Driver(String::from("connection mutex poisoned")))
    }
}

impl ConnPool for DuckDbPool {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let converted = convert::convert_params(params);
        let changed = self
            .lock()?
            .execute(sql, params_from_iter(converted.iter().map(Param)))
            .map_err(|err| translate(&err))?;
        Ok(u64::try_from(changed).unwrap_or(u64::MAX))
    }

    fn query_row(&self, sql: &str, params: &[Value]) -> Result<Option<Vec<Value>>> {
        let converted = convert::convert_params(params);
        fetch_one(&*self.lock()?, sql, &converted)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        let converted = convert::convert_params(params);
        fetch_all(&*self.lock()?, sql, &converted)
    }
}

fn fetch_one(conn: &Connection, sql: &str, params: &[Value]) -> Result<Option<Vec<Value>>> {
    let mut stmt = conn.prepare(sql).map_err(|err| translate(&err))?;
    let mut fetched = stmt
        .query(params_from_iter(params.iter().map(Param)))
        .map_err(|err| translate(&err))?;
    match fetched.next().map_err(|err| translate(&err))? {
        Some(row) => Ok(Some(read_row(row)?)),
        None => Ok(None),
    }
}

fn fetch_all(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
    let mut stmt = conn.prepare(sql).map_err(|err| translate(&err))?;
    let mut fetched = stmt
        .query(params_from_iter(params.iter().map(Param)))
        .map_err(|err| translate(&err))?;
    let mut out = Vec::new();
    while let Some(row) = fetched.next().map_err(|err| translate(&err))? {
        out.push(read_row(row)?);
    }
    Ok(out)
}

fn translate(err: &duckdb::Error) -> OrmError {
    OrmError::Driver(format!("duckdb driver error: {err}"))
}

/// Binds a host value through the driver's `ToSql`.
struct Param<'a>(&'a Value);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(to_driver_value(self.0)))
    }
}

fn to_driver_value(value: &Value) -> DriverValue {
    match value {
        Value::Null | Value::Timestamp(None) => DriverValue::Null,
        Value::Bool(b) => DriverValue::Boolean(*b),
        Value::Int(n) => DriverValue::BigInt(*n),
        Value::UInt(n) => DriverValue::UBigInt(*n),
        Value::Float(f) => DriverValue::Double(*f),
        Value::Text(s) => DriverValue::Text(s.clone()),
        Value::Blob(b) => DriverValue::Blob(b.clone()),
        Value::Timestamp(Some(t)) => {
            DriverValue::Timestamp(TimeUnit::Microsecond, t.and_utc().timestamp_micros())
        }
        // Lists are normally rewritten by the parameter converter; a direct
        // bind still gets the array literal text form.
        Value::List(values) => DriverValue::Text(convert::array_literal(values)),
    }
}

fn read_row(row: &duckdb::Row<'_>) -> Result<Vec<Value>> {
    let count = row.as_ref().column_count();
    let mut out = Vec::with_capacity(count);
    for idx in 0..count {
        let value: DriverValue = row.get(idx).map_err(|err| translate(&err))?;
        out.push(from_driver_value(value));
    }
    Ok(out)
}

fn from_driver_value(value: DriverValue) -> Value {
    match value {
        DriverValue::Null => Value::Null,
        DriverValue::Boolean(b) => Value::Bool(b),
        DriverValue::TinyInt(n) => Value::Int(i64::from(n)),
        DriverValue::SmallInt(n) => Value::Int(i64::from(n)),
        DriverValue::Int(n) => Value::Int(i64::from(n)),
        DriverValue::BigInt(n) => Value::Int(n),
        DriverValue::HugeInt(n) => {
            i64::try_from(n).map_or_else(|_| Value::Text(n.to_string()), Value::Int)
        }
        DriverValue::UTinyInt(n) => Value::Int(i64::from(n)),
        DriverValue::USmallInt(n) => Value::Int(i64::from(n)),
        DriverValue::UInt(n) => Value::Int(i64::from(n)),
        DriverValue::UBigInt(n) => Value::UInt(n),
        DriverValue::Float(f) => Value::Float(f64::from(f)),
        DriverValue::Double(f) => Value::Float(f),
        DriverValue::Timestamp(unit, raw) => {
            let micros = timestamp_micros(unit, raw);
            Value::Timestamp(DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc()))
        }
        DriverValue::Text(s) => Value::Text(s),
        DriverValue::Blob(b) => Value::Blob(b),
        DriverValue::List(values) => Value::List(values.into_iter().map(from_driver_value).collect()),
        other => {
            debug!(?other, "unmapped driver value, reading as NULL");
            Value::Null
        }
    }
}

const fn timestamp_micros(unit: TimeUnit, raw: i64) -> i64 {
    match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    }
}
