//! Field and table descriptors.
//!
//! Descriptors are the metadata the session hands to a dialect adapter:
//! one [`FieldDescriptor`] per column plus the table name, bundled as a
//! [`TableDescriptor`]. They are built once per statement or migration
//! call and are read-only to the adapter.

/// Logical kind of a field, before dialect-specific type mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Boolean.
    Bool,
    /// Signed integer; width carried in `FieldDescriptor::size`.
    Int,
    /// Unsigned integer; width carried in `FieldDescriptor::size`.
    Uint,
    /// Floating point; width carried in `FieldDescriptor::size`.
    Float,
    /// Text; declared length carried in `FieldDescriptor::size`.
    String,
    /// Timestamp.
    Time,
    /// Raw bytes.
    Bytes,
    /// A raw declared type name the mapper passes through unchanged,
    /// e.g. `UUID`, `JSON` or `BIGINT[]`.
    Custom(String),
}

/// A default value declared on a field.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Int(i64),
    /// Float default.
    Float(f64),
    /// Text default.
    Text(String),
    /// A verbatim SQL expression, e.g. `CURRENT_TIMESTAMP` or
    /// `nextval('seq_users_id')`.
    Expression(String),
}

impl DefaultValue {
    /// Renders the default as SQL.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// Per-column metadata supplied to the dialect adapter.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Name of the field on the record struct.
    pub name: String,
    /// Database column name.
    pub column: String,
    /// Logical kind.
    pub kind: FieldKind,
    /// Bit width for numeric kinds, declared length for strings.
    /// Zero means unspecified.
    pub size: u32,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
    /// Whether the column's value is assigned by the database engine.
    pub auto_increment: bool,
    /// Whether the column is NOT NULL.
    pub not_null: bool,
    /// Whether the column carries a UNIQUE constraint.
    pub unique: bool,
    /// Declared default, if any.
    pub default: Option<DefaultValue>,
}

impl FieldDescriptor {
    /// Creates a descriptor with no size, no flags and no default.
    #[must_use]
    pub fn new(name: impl Into<String>, column: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            kind,
            size: 0,
            primary_key: false,
            auto_increment: false,
            not_null: false,
            unique: false,
            default: None,
        }
    }

    /// Sets the bit width or declared length.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Marks the column as primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as engine-assigned.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Declares a default value.
    #[must_use]
    pub fn default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Parsed record metadata: the table name plus its ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    /// Target table name.
    pub table: String,
    /// Ordered column descriptors.
    pub fields: Vec<FieldDescriptor>,
}

impl TableDescriptor {
    /// Creates a descriptor for `table` with the given fields.
    #[must_use]
    pub fn new(table: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            table: table.into(),
            fields,
        }
    }

    /// Returns the auto-increment field, if any.
    ///
    /// At most one auto-increment column is meaningfully supported; the
    /// first declared one wins.
    #[must_use]
    pub fn auto_increment_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.auto_increment)
    }

    /// Looks up a field by database column name.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.column == column)
    }
}
