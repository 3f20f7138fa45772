//! Typed wrappers for DuckDB array columns.
//!
//! Each wrapper binds as a list value and declares the native array column
//! type. An empty wrapper binds as an empty list, not NULL.

use mallard_core::value::{IntoValue, Value};

/// A `VARCHAR[]` column value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringArray(Vec<String>);

impl StringArray {
    /// Wraps the given elements.
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Returns the elements.
    #[must_use]
    pub fn get(&self) -> &[String] {
        &self.0
    }

    /// Declared column type.
    #[must_use]
    pub const fn data_type() -> &'static str {
        "VARCHAR[]"
    }

    /// Reads a wrapper back from a queried value. Returns `None` when the
    /// value is not a list of text elements.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::List(values) = value else {
            return None;
        };
        values
            .iter()
            .map(|v| match v {
                Value::Text(s) => Some(s.clone()),
                _ => None,
            })
            .collect::<Option<Vec<String>>>()
            .map(Self)
    }
}

impl From<Vec<String>> for StringArray {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<StringArray> for Vec<String> {
    fn from(array: StringArray) -> Self {
        array.0
    }
}

impl IntoValue for StringArray {
    fn into_value(self) -> Value {
        Value::List(self.0.into_iter().map(Value::Text).collect())
    }
}

/// A `BIGINT[]` column value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntArray(Vec<i64>);

impl IntArray {
    /// Wraps the given elements.
    #[must_use]
    pub const fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// Returns the elements.
    #[must_use]
    pub fn get(&self) -> &[i64] {
        &self.0
    }

    /// Declared column type.
    #[must_use]
    pub const fn data_type() -> &'static str {
        "BIGINT[]"
    }

    /// Reads a wrapper back from a queried value. Returns `None` when the
    /// value is not a list of integer elements.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::List(values) = value else {
            return None;
        };
        values
            .iter()
            .map(|v| match v {
                Value::Int(n) => Some(*n),
                Value::UInt(n) => i64::try_from(*n).ok(),
                _ => None,
            })
            .collect::<Option<Vec<i64>>>()
            .map(Self)
    }
}

impl From<Vec<i64>> for IntArray {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl From<IntArray> for Vec<i64> {
    fn from(array: IntArray) -> Self {
        array.0
    }
}

impl IntoValue for IntArray {
    fn into_value(self) -> Value {
        Value::List(self.0.into_iter().map(Value::Int).collect())
    }
}

/// A `DOUBLE[]` column value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatArray(Vec<f64>);

impl FloatArray {
    /// Wraps the given elements.
    #[must_use]
    pub const fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Returns the elements.
    #[must_use]
    pub fn get(&self) -> &[f64] {
        &self.0
    }

    /// Declared column type.
    #[must_use]
    pub const fn data_type() -> &'static str {
        "DOUBLE[]"
    }

    /// Reads a wrapper back from a queried value. Returns `None` when the
    /// value is not a list of numeric elements. Integer elements are
    /// widened to doubles.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::List(values) = value else {
            return None;
        };
        values
            .iter()
            .map(|v| match v {
                Value::Float(f) => Some(*f),
                Value::Int(n) => Some(*n as f64),
                _ => None,
            })
            .collect::<Option<Vec<f64>>>()
            .map(Self)
    }
}

impl From<Vec<f64>> for FloatArray {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<FloatArray> for Vec<f64> {
    fn from(array: FloatArray) -> Self {
        array.0
    }
}

impl IntoValue for FloatArray {
    fn into_value(self) -> Value {
        Value::List(self.0.into_iter().map(Value::Float).collect())
    }
}
