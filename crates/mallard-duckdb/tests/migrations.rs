mod common;

use common::{open_with_users, User};
use mallard_core::error::OrmError;
use mallard_core::model::Record;
use mallard_core::schema::{FieldDescriptor, FieldKind};
use mallard_core::value::Value;
use mallard_core::Session;
use mallard_duckdb::DuckDbDialector;

#[test]
fn test_create_table_provisions_key_sequence() {
    let session = open_with_users().unwrap();

    // The column default draws from the sequence, so a plain INSERT that
    // omits the key still gets one.
    session
        .execute(
            "INSERT INTO users (name) VALUES (?)",
            &[Value::Text(String::from("ada"))],
        )
        .unwrap();
    let row = session
        .query_row("SELECT max(id) FROM users", &[])
        .unwrap()
        .unwrap();
    assert_eq!(row, vec![Value::Int(1)]);

    let next = session
        .query_row("SELECT nextval('seq_users_id')", &[])
        .unwrap()
        .unwrap();
    assert_eq!(next, vec![Value::Int(2)]);
}

#[test]
fn test_create_table_is_idempotent() {
    let session = open_with_users().unwrap();
    let descriptor = User::default().descriptor();
    session.migrator().create_table(&descriptor).unwrap();
    session.migrator().create_table(&descriptor).unwrap();
}

#[test]
fn test_has_table() {
    let session = open_with_users().unwrap();
    let migrator = session.migrator();
    assert!(migrator.has_table("users").unwrap());
    assert!(!migrator.has_table("missing").unwrap());
}

#[test]
fn test_has_column() {
    let session = open_with_users().unwrap();
    let migrator = session.migrator();
    assert!(migrator.has_column("users", "name").unwrap());
    assert!(!migrator.has_column("users", "missing").unwrap());
}

#[test]
fn test_add_column() {
    let session = open_with_users().unwrap();
    let mut descriptor = User::default().descriptor();
    descriptor
        .fields
        .push(FieldDescriptor::new("Age", "age", FieldKind::Int).size(32));

    let migrator = session.migrator();
    migrator.add_column(&descriptor, "age").unwrap();
    assert!(migrator.has_column("users", "age").unwrap());
}

#[test]
fn test_add_column_unknown_to_descriptor_errors() {
    let session = open_with_users().unwrap();
    let descriptor = User::default().descriptor();
    let err = session
        .migrator()
        .add_column(&descriptor, "missing")
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn { .. }));
}

#[test]
fn test_rename_and_drop_column() {
    let session = open_with_users().unwrap();
    let migrator = session.migrator();

    migrator.rename_column("users", "name", "full_name").unwrap();
    assert!(migrator.has_column("users", "full_name").unwrap());
    assert!(!migrator.has_column("users", "name").unwrap());

    migrator.drop_column("users", "full_name").unwrap();
    assert!(!migrator.has_column("users", "full_name").unwrap());
}

#[test]
fn test_rename_table() {
    let session = open_with_users().unwrap();
    let migrator = session.migrator();
    migrator.rename_table("users", "people").unwrap();
    assert!(migrator.has_table("people").unwrap());
    assert!(!migrator.has_table("users").unwrap());
}

#[test]
fn test_drop_table() {
    let session = open_with_users().unwrap();
    let migrator = session.migrator();
    migrator.drop_table("users").unwrap();
    assert!(!migrator.has_table("users").unwrap());
    // Dropping again is fine.
    migrator.drop_table("users").unwrap();
}

#[test]
fn test_create_and_drop_index() {
    let session = open_with_users().unwrap();
    let migrator = session.migrator();
    migrator
        .create_index("users", "idx_users_name", &["name"], false)
        .unwrap();
    migrator
        .create_index("users", "idx_users_name", &["name"], false)
        .unwrap();
    migrator.drop_index("idx_users_name").unwrap();
}

#[test]
fn test_has_constraint_with_unknown_name() {
    let session = open_with_users().unwrap();
    assert!(!session
        .migrator()
        .has_constraint("users", "missing_constraint")
        .unwrap());
}

#[test]
fn test_table_persists_in_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mallard.db");
    let dsn = path.to_string_lossy().into_owned();

    {
        let session = Session::open(DuckDbDialector::open(dsn.clone())).unwrap();
        session
            .migrator()
            .create_table(&User::default().descriptor())
            .unwrap();
        let mut user = User::named("ada");
        session.create(&mut user).unwrap();
    }

    let session = Session::open(DuckDbDialector::open(dsn)).unwrap();
    let row = session
        .query_row("SELECT name FROM users", &[])
        .unwrap()
        .unwrap();
    assert_eq!(row, vec![Value::Text(String::from("ada"))]);
}

#[test]
fn test_rendered_column_types_follow_descriptor() {
    let session = Session::open(DuckDbDialector::open(":memory:")).unwrap();
    let descriptor = mallard_core::schema::TableDescriptor::new(
        "samples",
        vec![
            FieldDescriptor::new("Id", "id", FieldKind::Uint)
                .size(32)
                .primary_key()
                .auto_increment(),
            FieldDescriptor::new("Flag", "flag", FieldKind::Bool),
            FieldDescriptor::new("Score", "score", FieldKind::Float).size(32),
            FieldDescriptor::new("Note", "note", FieldKind::String).size(40),
            FieldDescriptor::new("At", "at", FieldKind::Time),
            FieldDescriptor::new("Payload", "payload", FieldKind::Bytes),
        ],
    );
    session.migrator().create_table(&descriptor).unwrap();

    let rows = session
        .query_rows(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_name = ? ORDER BY ordinal_position",
            &[Value::Text(String::from("samples"))],
        )
        .unwrap();
    let types: Vec<(String, String)> = rows
        .into_iter()
        .map(|entry| match (&entry[0], &entry[1]) {
            (Value::Text(name), Value::Text(ty)) => (name.clone(), ty.clone()),
            other => panic!("unexpected row shape: {other:?}"),
        })
        .collect();

    assert_eq!(types[0], (String::from("id"), String::from("INTEGER")));
    assert_eq!(types[1], (String::from("flag"), String::from("BOOLEAN")));
    assert_eq!(types[2], (String::from("score"), String::from("FLOAT")));
    // DuckDB accepts a VARCHAR length but does not retain it.
    assert_eq!(types[3], (String::from("note"), String::from("VARCHAR")));
    assert_eq!(types[4], (String::from("at"), String::from("TIMESTAMP")));
    assert_eq!(types[5], (String::from("payload"), String::from("BLOB")));
}
