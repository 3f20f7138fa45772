//! Bound parameter values.
//!
//! Every value crossing into a driver is one of these shapes. Dialect
//! adapters may rewrite values at their driver boundary (for example,
//! unwrapping nullable timestamps) but upstream code always sees the
//! original shape.

use chrono::NaiveDateTime;

/// A SQL value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Nullable timestamp. `None` is a typed null that drivers must bind
    /// as an explicit SQL NULL.
    Timestamp(Option<NaiveDateTime>),
    /// Sequence value (anything list-shaped that is not text or bytes).
    List(Vec<Value>),
}

impl Value {
    /// Returns the SQL literal representation for inline use.
    ///
    /// Used for logging and `explain` output; statements themselves are
    /// always parameterized.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null | Self::Timestamp(None) => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => {
                // Escape single quotes by doubling them
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Timestamp(Some(t)) => {
                format!("TIMESTAMP '{}'", t.format("%Y-%m-%d %H:%M:%S%.6f"))
            }
            Self::List(values) => {
                let rendered: Vec<String> = values.iter().map(Self::to_sql_inline).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }

    /// Returns the parameter placeholder.
    #[must_use]
    pub const fn placeholder() -> &'static str {
        "?"
    }
}

/// Trait for types that can be converted into bound values.
pub trait IntoValue {
    /// Converts the value into a [`Value`].
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Self {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for i16 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for i8 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        Value::UInt(self)
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u16 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u8 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Blob(self)
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
}

impl IntoValue for Option<NaiveDateTime> {
    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl IntoValue for Vec<String> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Value::Text).collect())
    }
}

impl IntoValue for Vec<i64> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Value::Int).collect())
    }
}

impl IntoValue for Vec<i32> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(|v| Value::Int(i64::from(v))).collect())
    }
}

impl IntoValue for Vec<f64> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Value::Float).collect())
    }
}
