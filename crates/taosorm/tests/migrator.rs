mod common;

use common::RecordingPool;
use std::collections::BTreeMap;
use taosorm::{Config, DataType, Db, Field, OrmError, Row, Schema, TaosDialect, Value};

fn open(pool: RecordingPool) -> Db<RecordingPool> {
    Db::open(TaosDialect::default(), pool, Config::new()).unwrap()
}

fn meters() -> Schema {
    Schema::new(
        "meters",
        vec![
            Field::new("Ts", DataType::Time).db_name("ts"),
            Field::new("Current", DataType::Float)
                .db_name("current")
                .size(32),
            Field::new("Voltage", DataType::Int)
                .db_name("voltage")
                .size(32),
            Field::new("Location", DataType::Bytes)
                .db_name("location")
                .tag(),
            Field::new("GroupId", DataType::Int)
                .db_name("group_id")
                .size(32)
                .tag(),
        ],
    )
}

#[tokio::test]
async fn alter_column_modifies_type() {
    let db = open(RecordingPool::new());
    let migrator = db.migrator();
    assert_eq!(
        migrator.alter_column_sql(&meters(), "Current").unwrap(),
        "ALTER TABLE meters MODIFY COLUMN current FLOAT"
    );

    migrator.alter_column(&meters(), "location").await.unwrap();
    assert_eq!(
        db.pool().last_sql(),
        "ALTER TABLE meters MODIFY COLUMN location BINARY(64)"
    );
}

#[tokio::test]
async fn alter_unknown_column_fails() {
    let db = open(RecordingPool::new());
    let err = db
        .migrator()
        .alter_column(&meters(), "phase")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "failed to look up field with name: phase");
    assert!(db.pool().calls().is_empty());
}

#[tokio::test]
async fn create_stable_from_schema() {
    let db = open(RecordingPool::new());
    db.migrator().create_stable(&meters()).await.unwrap();
    assert_eq!(
        db.pool().last_sql(),
        "CREATE STABLE IF NOT EXISTS meters (ts TIMESTAMP,current FLOAT,voltage INT) \
         TAGS(location BINARY(64),group_id INT)"
    );
}

#[tokio::test]
async fn create_stable_requires_tags() {
    let db = open(RecordingPool::new());
    let schema = Schema::new("log", vec![Field::new("ts", DataType::Time)]);
    let err = db.migrator().create_stable(&schema).await.unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
}

#[tokio::test]
async fn create_table_from_schema_ignores_tags() {
    let db = open(RecordingPool::new());
    let schema = Schema::new(
        "log",
        vec![
            Field::new("ts", DataType::Time),
            Field::new("msg", DataType::String),
            Field::new("host", DataType::String).tag(),
        ],
    );
    db.migrator().create_table(&schema).await.unwrap();
    assert_eq!(
        db.pool().last_sql(),
        "CREATE TABLE IF NOT EXISTS log (ts TIMESTAMP,msg NCHAR(64))"
    );
}

#[tokio::test]
async fn create_child_table_with_tags() {
    let db = open(RecordingPool::new());
    let tags = BTreeMap::from([
        ("location".to_string(), Value::from("California.SanFrancisco")),
        ("group_id".to_string(), Value::from(2)),
    ]);

    let (sql, vars) = db
        .migrator()
        .create_child_table_sql("d1001", "meters", tags.clone());
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS d1001 USING meters(group_id,location) TAGS (?,'?')"
    );
    assert_eq!(vars.len(), 2);

    db.migrator()
        .create_child_table("d1001", "meters", tags)
        .await
        .unwrap();
    assert_eq!(
        db.pool().last_sql(),
        "CREATE TABLE IF NOT EXISTS d1001 USING meters(group_id,location) TAGS (2,'California.SanFrancisco')"
    );
}

#[tokio::test]
async fn full_data_type_of_matches_dialect() {
    let db = open(RecordingPool::new());
    let field = Field::new("note", DataType::String).size(128);
    assert_eq!(db.migrator().full_data_type_of(&field), "NCHAR(128)");
}

#[tokio::test]
async fn column_types_from_describe() {
    let pool = RecordingPool::new().with_rows(vec![
        Row::new()
            .with("field", "ts")
            .with("type", "TIMESTAMP")
            .with("length", 8i64)
            .with("note", ""),
        Row::new()
            .with("field", "location")
            .with("type", "BINARY")
            .with("length", 64i64)
            .with("note", "TAG"),
    ]);
    let db = open(pool);
    let columns = db.migrator().column_types("meters").await.unwrap();

    assert_eq!(db.pool().last_sql(), "DESCRIBE meters");
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1].name(), "location");
    assert_eq!(columns[1].database_type_name(), "BINARY");
    assert_eq!(columns[1].length(), Some(64));
    assert_eq!(columns[1].nullable(), None);
    assert_eq!(columns[1].decimal_size(), None);
}

#[tokio::test]
async fn unsupported_operations() {
    let db = open(RecordingPool::new());
    let migrator = db.migrator();
    let schema = meters();

    let cases = [
        (
            migrator.rename_column(&schema, "current", "amps"),
            "RenameColumn not support",
        ),
        (
            migrator.rename_index(&schema, "a", "b"),
            "RenameIndex not support",
        ),
        (
            migrator.drop_constraint(&schema, "pk"),
            "DropConstraint not support",
        ),
        (
            migrator.auto_migrate(std::slice::from_ref(&schema)),
            "AutoMigrate not support",
        ),
    ];
    for (result, message) in cases {
        let err = result.unwrap_err();
        assert!(err.is_not_supported());
        assert_eq!(err.to_string(), message);
    }
    assert!(db.pool().calls().is_empty());
}
