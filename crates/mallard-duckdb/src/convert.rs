//! Bound parameter conversion.
//!
//! The driver cannot bind every shape the host hands it, so values are
//! rewritten immediately before binding: nullable timestamps become either
//! the wrapped timestamp or an explicit NULL, and list values become the
//! DuckDB array literal text form. Everything else passes through
//! untouched. The conversion happens only at the driver boundary; upstream
//! code always observes the original values.

use mallard_core::value::Value;

/// Converts a parameter slice for binding.
pub fn convert_params(params: &[Value]) -> Vec<Value> {
    params.iter().map(convert_value).collect()
}

fn convert_value(value: &Value) -> Value {
    match value {
        Value::Timestamp(None) => Value::Null,
        Value::List(values) => Value::Text(array_literal(values)),
        other => other.clone(),
    }
}

/// Renders a list value as a DuckDB array literal, e.g. `[1, 2, 3]`.
pub fn array_literal(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(Value::to_sql_inline).collect();
    format!("[{}]", rendered.join(", "))
}
