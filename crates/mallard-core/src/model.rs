//! Record contract and generated-key write-back.
//!
//! The original design used runtime reflection to read field values and to
//! write engine-generated keys back into caller structs. Here the record
//! itself implements [`Record`], and the generated key is a tagged union of
//! the integer representations drivers actually return, with the sign and
//! overflow checks at the write-back site.

use crate::schema::TableDescriptor;
use crate::value::Value;

/// A scalar key returned by the engine after an insert.
///
/// Transient: it exists only between statement execution and the
/// write-back into the caller's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKey {
    /// 32-bit signed source.
    I32(i32),
    /// 64-bit signed source.
    I64(i64),
    /// 64-bit unsigned source.
    U64(u64),
}

/// Errors rejected during key write-back.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    /// A negative key cannot be stored in an unsigned field.
    #[error("generated key {0} is negative and cannot be stored in an unsigned field")]
    Negative(i64),

    /// An unsigned key exceeds the signed 64-bit range.
    #[error("generated key {0} exceeds the signed 64-bit range")]
    SignedRange(u64),

    /// The key does not fit the declared width of the target field.
    #[error("generated key does not fit the width of the target field")]
    Narrowing,
}

impl GeneratedKey {
    /// Converts the key for an unsigned target field.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Negative`] for negative source values.
    pub fn to_unsigned(self) -> Result<u64, KeyError> {
        match self {
            Self::I32(v) if v < 0 => Err(KeyError::Negative(i64::from(v))),
            Self::I32(v) => Ok(u64::from(v.unsigned_abs())),
            Self::I64(v) if v < 0 => Err(KeyError::Negative(v)),
            Self::I64(v) => Ok(v.unsigned_abs()),
            Self::U64(v) => Ok(v),
        }
    }

    /// Converts the key for a signed target field.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::SignedRange`] for unsigned values above
    /// `i64::MAX`.
    pub fn to_signed(self) -> Result<i64, KeyError> {
        match self {
            Self::I32(v) => Ok(i64::from(v)),
            Self::I64(v) => Ok(v),
            Self::U64(v) => i64::try_from(v).map_err(|_| KeyError::SignedRange(v)),
        }
    }
}

/// A record a session can insert.
///
/// Implementations expose their parsed metadata, the current value of each
/// column and a write-back site for the engine-generated key.
pub trait Record {
    /// Returns the parsed metadata for this record type.
    fn descriptor(&self) -> TableDescriptor;

    /// Returns the current value of the given column, or `None` if the
    /// column should be skipped for this statement.
    fn value_of(&self, column: &str) -> Option<Value>;

    /// Writes the engine-generated key into the auto-increment field.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] when the key cannot be represented in the
    /// target field.
    fn assign_key(&mut self, key: GeneratedKey) -> Result<(), KeyError>;
}
