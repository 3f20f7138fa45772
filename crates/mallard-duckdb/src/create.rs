//! The create callback.
//!
//! DuckDB reports `last_insert_id` as unsupported, so generated keys are
//! recovered by appending a `RETURNING` clause for the auto-increment
//! column and reading the inserted row back.

use mallard_core::callbacks::CreateContext;
use mallard_core::connection::ConnPool;
use mallard_core::error::OrmError;
use mallard_core::model::{GeneratedKey, Record};
use mallard_core::schema::TableDescriptor;
use mallard_core::value::Value;
use tracing::{debug, error};

use crate::quote;

#[derive(Debug)]
pub struct InsertParts {
    pub sql: String,
    pub vars: Vec<Value>,
    pub returning: bool,
}

/// Synthesizes the INSERT for a record.
///
/// Auto-increment fields are omitted so the column default (a sequence)
/// fires, and fields the record holds no value for are skipped. When the
/// descriptor declares an auto-increment column, a `RETURNING` clause for
/// it is appended.
pub fn build_insert(
    descriptor: &TableDescriptor,
    record: &dyn Record,
) -> Result<InsertParts, OrmError> {
    let field_count = descriptor.fields.len();
    let mut columns = Vec::with_capacity(field_count);
    let mut placeholders = Vec::with_capacity(field_count);
    let mut vars = Vec::with_capacity(field_count);

    for field in &descriptor.fields {
        if field.auto_increment {
            continue;
        }
        let Some(value) = record.value_of(&field.column) else {
            continue;
        };
        columns.push(quote::quote(&field.column));
        placeholders.push(Value::placeholder());
        vars.push(value);
    }

    if columns.is_empty() {
        return Err(OrmError::EmptyInsert);
    }

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote::quote(&descriptor.table),
        columns.join(", "),
        placeholders.join(", ")
    );

    let returning = descriptor.auto_increment_field();
    if let Some(field) = returning {
        sql.push_str(" RETURNING ");
        sql.push_str(&quote::quote(&field.column));
    }

    Ok(InsertParts {
        sql,
        vars,
        returning: returning.is_some(),
    })
}

pub fn create_callback(conn: &dyn ConnPool, ctx: &mut CreateContext<'_>) {
    if ctx.error.is_some() {
        return;
    }

    let parts = match build_insert(&ctx.descriptor, &*ctx.record) {
        Ok(parts) => parts,
        Err(err) => {
            ctx.error = Some(err);
            return;
        }
    };
    debug!(sql = %parts.sql, "synthesized insert");

    if parts.returning {
        match conn.query_row(&parts.sql, &parts.vars) {
            Ok(Some(row)) => {
                ctx.rows_affected = 1;
                assign_generated_key(&mut *ctx.record, row.first());
            }
            Ok(None) => {
                ctx.error = Some(OrmError::Driver(String::from(
                    "insert with RETURNING yielded no row",
                )));
            }
            Err(err) => ctx.error = Some(err),
        }
    } else {
        match conn.execute(&parts.sql, &parts.vars) {
            Ok(affected) => ctx.rows_affected = affected,
            Err(err) => ctx.error = Some(err),
        }
    }
}

/// The row is already written by the time the key comes back, so a key the
/// record cannot hold is logged and the insert still reports success.
fn assign_generated_key(record: &mut dyn Record, scalar: Option<&Value>) {
    let key = match scalar {
        Some(Value::Int(n)) => GeneratedKey::I64(*n),
        Some(Value::UInt(n)) => GeneratedKey::U64(*n),
        other => {
            error!(?other, "cannot interpret returned key");
            return;
        }
    };
    if let Err(err) = record.assign_key(key) {
        error!(%err, "generated key does not fit the record field");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallard_core::model::KeyError;
    use mallard_core::schema::{FieldDescriptor, FieldKind};

    #[derive(Default)]
    struct User {
        id: u32,
        name: String,
    }

    impl Record for User {
        fn descriptor(&self) -> TableDescriptor {
            TableDescriptor::new(
                "users",
                vec![
                    FieldDescriptor::new("Id", "id", FieldKind::Uint)
                        .size(32)
                        .primary_key()
                        .auto_increment(),
                    FieldDescriptor::new("Name", "name", FieldKind::String).not_null(),
                ],
            )
        }

        fn value_of(&self, column: &str) -> Option<Value> {
            match column {
                "id" => Some(Value::UInt(u64::from(self.id))),
                "name" => Some(Value::Text(self.name.clone())),
                _ => None,
            }
        }

        fn assign_key(&mut self, key: GeneratedKey) -> Result<(), KeyError> {
            self.id = u32::try_from(key.to_unsigned()?).map_err(|_| KeyError::Narrowing)?;
            Ok(())
        }
    }

    #[test]
    fn test_insert_skips_auto_increment_and_appends_returning() {
        let user = User {
            id: 0,
            name: String::from("ada"),
        };
        let parts = build_insert(&user.descriptor(), &user).unwrap();
        assert_eq!(
            parts.sql,
            "INSERT INTO \"users\" (\"name\") VALUES (?) RETURNING \"id\""
        );
        assert_eq!(parts.vars, vec![Value::Text(String::from("ada"))]);
        assert!(parts.returning);
    }

    struct Event {
        code: i64,
    }

    impl Record for Event {
        fn descriptor(&self) -> TableDescriptor {
            TableDescriptor::new(
                "events",
                vec![FieldDescriptor::new("Code", "code", FieldKind::Int)],
            )
        }

        fn value_of(&self, column: &str) -> Option<Value> {
            (column == "code").then_some(Value::Int(self.code))
        }

        fn assign_key(&mut self, _key: GeneratedKey) -> Result<(), KeyError> {
            Ok(())
        }
    }

    #[test]
    fn test_insert_without_auto_increment_has_no_returning() {
        let event = Event { code: 9 };
        let parts = build_insert(&event.descriptor(), &event).unwrap();
        assert_eq!(parts.sql, "INSERT INTO \"events\" (\"code\") VALUES (?)");
        assert!(!parts.returning);
    }

    struct KeyOnly;

    impl Record for KeyOnly {
        fn descriptor(&self) -> TableDescriptor {
            TableDescriptor::new(
                "keys",
                vec![FieldDescriptor::new("Id", "id", FieldKind::Uint)
                    .primary_key()
                    .auto_increment()],
            )
        }

        fn value_of(&self, _column: &str) -> Option<Value> {
            None
        }

        fn assign_key(&mut self, _key: GeneratedKey) -> Result<(), KeyError> {
            Ok(())
        }
    }

    #[test]
    fn test_insert_with_no_bindable_fields_errors() {
        let record = KeyOnly;
        let err = build_insert(&record.descriptor(), &record).unwrap_err();
        assert!(matches!(err, OrmError::EmptyInsert));
    }

    struct ReturningPool(Value);

    impl ConnPool for ReturningPool {
        fn execute(&self, _sql: &str, _params: &[Value]) -> mallard_core::Result<u64> {
            Ok(1)
        }

        fn query_row(
            &self,
            _sql: &str,
            _params: &[Value],
        ) -> mallard_core::Result<Option<Vec<Value>>> {
            Ok(Some(vec![self.0.clone()]))
        }

        fn query(&self, _sql: &str, _params: &[Value]) -> mallard_core::Result<Vec<Vec<Value>>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_returned_key_is_written_back() {
        let mut user = User {
            id: 0,
            name: String::from("ada"),
        };
        let mut ctx = CreateContext {
            descriptor: user.descriptor(),
            record: &mut user,
            rows_affected: 0,
            error: None,
        };
        create_callback(&ReturningPool(Value::Int(5)), &mut ctx);
        assert!(ctx.error.is_none());
        assert_eq!(ctx.rows_affected, 1);
        assert_eq!(user.id, 5);
    }

    #[test]
    fn test_unrepresentable_key_soft_fails() {
        // A negative key cannot land in the unsigned field; the insert
        // itself still counts as a success.
        let mut user = User {
            id: 0,
            name: String::from("ada"),
        };
        let mut ctx = CreateContext {
            descriptor: user.descriptor(),
            record: &mut user,
            rows_affected: 0,
            error: None,
        };
        create_callback(&ReturningPool(Value::Int(-1)), &mut ctx);
        assert!(ctx.error.is_none());
        assert_eq!(ctx.rows_affected, 1);
        assert_eq!(user.id, 0);
    }

    #[test]
    fn test_fields_without_values_are_skipped() {
        struct Partial;
        impl Record for Partial {
            fn descriptor(&self) -> TableDescriptor {
                TableDescriptor::new(
                    "partial",
                    vec![
                        FieldDescriptor::new("A", "a", FieldKind::Int),
                        FieldDescriptor::new("B", "b", FieldKind::Int),
                    ],
                )
            }
            fn value_of(&self, column: &str) -> Option<Value> {
                (column == "a").then_some(Value::Int(1))
            }
            fn assign_key(&mut self, _key: GeneratedKey) -> Result<(), KeyError> {
                Ok(())
            }
        }
        let record = Partial;
        let parts = build_insert(&record.descriptor(), &record).unwrap();
        assert_eq!(parts.sql, "INSERT INTO \"partial\" (\"a\") VALUES (?)");
        assert_eq!(parts.vars, vec![Value::Int(1)]);
    }
}
