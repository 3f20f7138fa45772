//! Field type mapping.

use mallard_core::schema::{FieldDescriptor, FieldKind};

/// String size used when neither the field nor the dialector configures one.
const DEFAULT_STRING_SIZE: u32 = 256;

/// Largest configurable default string size; anything above falls back to
/// [`DEFAULT_STRING_SIZE`].
const MAX_DEFAULT_STRING_SIZE: u32 = 65535;

/// Returns the DuckDB column type for a field descriptor.
#[must_use]
pub fn type_name_for(field: &FieldDescriptor, default_string_size: u32) -> String {
    match &field.kind {
        FieldKind::Bool => String::from("BOOLEAN"),
        FieldKind::Int => String::from(signed_integer(field.size)),
        FieldKind::Uint => {
            // Unsigned fields always map to signed column types: DuckDB
            // rejects foreign keys between signed and unsigned columns, and
            // sequences only back signed types. Primary keys narrow to
            // INTEGER to match the sequence default.
            if field.primary_key {
                String::from("INTEGER")
            } else {
                String::from(signed_integer(field.size))
            }
        }
        FieldKind::Float => {
            if field.size == 32 {
                String::from("REAL")
            } else {
                String::from("DOUBLE")
            }
        }
        FieldKind::String => {
            let mut size = field.size;
            if size == 0 {
                size = if default_string_size > 0 && default_string_size <= MAX_DEFAULT_STRING_SIZE
                {
                    default_string_size
                } else {
                    DEFAULT_STRING_SIZE
                };
            }
            if size < 65536 {
                format!("VARCHAR({size})")
            } else {
                String::from("TEXT")
            }
        }
        FieldKind::Time => String::from("TIMESTAMP"),
        FieldKind::Bytes => String::from("BLOB"),
        FieldKind::Custom(name) => name.clone(),
    }
}

const fn signed_integer(size: u32) -> &'static str {
    match size {
        8 => "TINYINT",
        16 => "SMALLINT",
        32 => "INTEGER",
        _ => "BIGINT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new("F", "f", kind)
    }

    #[test]
    fn test_bool_maps_to_boolean() {
        assert_eq!(type_name_for(&field(FieldKind::Bool), 0), "BOOLEAN");
    }

    #[test]
    fn test_int_size_ladder() {
        assert_eq!(type_name_for(&field(FieldKind::Int).size(8), 0), "TINYINT");
        assert_eq!(
            type_name_for(&field(FieldKind::Int).size(16), 0),
            "SMALLINT"
        );
        assert_eq!(type_name_for(&field(FieldKind::Int).size(32), 0), "INTEGER");
        assert_eq!(type_name_for(&field(FieldKind::Int).size(64), 0), "BIGINT");
        assert_eq!(type_name_for(&field(FieldKind::Int), 0), "BIGINT");
    }

    #[test]
    fn test_uint_never_maps_to_unsigned_types() {
        for size in [8, 16, 32, 64, 0] {
            let name = type_name_for(&field(FieldKind::Uint).size(size), 0);
            assert!(
                !name.starts_with('U'),
                "uint size {size} mapped to unsigned type {name}"
            );
        }
    }

    #[test]
    fn test_uint_primary_key_maps_to_integer() {
        let f = field(FieldKind::Uint).size(64).primary_key();
        assert_eq!(type_name_for(&f, 0), "INTEGER");
    }

    #[test]
    fn test_uint_plain_follows_signed_ladder() {
        assert_eq!(type_name_for(&field(FieldKind::Uint).size(8), 0), "TINYINT");
        assert_eq!(type_name_for(&field(FieldKind::Uint).size(64), 0), "BIGINT");
    }

    #[test]
    fn test_float_sizes() {
        assert_eq!(type_name_for(&field(FieldKind::Float).size(32), 0), "REAL");
        assert_eq!(type_name_for(&field(FieldKind::Float).size(64), 0), "DOUBLE");
        assert_eq!(type_name_for(&field(FieldKind::Float), 0), "DOUBLE");
    }

    #[test]
    fn test_string_default_size() {
        assert_eq!(type_name_for(&field(FieldKind::String), 0), "VARCHAR(256)");
    }

    #[test]
    fn test_string_configured_default_size() {
        assert_eq!(
            type_name_for(&field(FieldKind::String), 1024),
            "VARCHAR(1024)"
        );
    }

    #[test]
    fn test_string_out_of_range_default_falls_back() {
        assert_eq!(
            type_name_for(&field(FieldKind::String), 70000),
            "VARCHAR(256)"
        );
    }

    #[test]
    fn test_string_explicit_size_wins() {
        assert_eq!(
            type_name_for(&field(FieldKind::String).size(40), 1024),
            "VARCHAR(40)"
        );
    }

    #[test]
    fn test_string_large_size_maps_to_text() {
        assert_eq!(
            type_name_for(&field(FieldKind::String).size(100_000), 0),
            "TEXT"
        );
    }

    #[test]
    fn test_time_and_bytes() {
        assert_eq!(type_name_for(&field(FieldKind::Time), 0), "TIMESTAMP");
        assert_eq!(type_name_for(&field(FieldKind::Bytes), 0), "BLOB");
    }

    #[test]
    fn test_custom_passthrough() {
        let f = field(FieldKind::Custom(String::from("UUID")));
        assert_eq!(type_name_for(&f, 0), "UUID");
    }
}
