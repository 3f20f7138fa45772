#![allow(dead_code)]

use mallard_core::model::{GeneratedKey, KeyError, Record};
use mallard_core::schema::{FieldDescriptor, FieldKind, TableDescriptor};
use mallard_core::value::Value;
use mallard_core::{Result, Session};
use mallard_duckdb::DuckDbDialector;

/// Test model with a sequence-backed key.
#[derive(Debug, Default)]
pub struct User {
    pub id: u32,
    pub name: String,
}

impl User {
    pub fn named(name: &str) -> Self {
        Self {
            id: 0,
            name: String::from(name),
        }
    }
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

    fn assign_key(&mut self, key: GeneratedKey) -> std::result::Result<(), KeyError> {
        self.id = u32::try_from(key.to_unsigned()?).map_err(|_| KeyError::Narrowing)?;
        Ok(())
    }
}

/// Opens an in-memory session with the `users` table migrated.
pub fn open_with_users() -> Result<Session> {
    let session = Session::open(DuckDbDialector::open(":memory:"))?;
    session
        .migrator()
        .create_table(&User::default().descriptor())?;
    Ok(session)
}
