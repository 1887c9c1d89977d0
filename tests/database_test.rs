use polars::prelude::*;
use rusqlite::types::Value;
use tempfile::tempdir;

use disaster_response_etl::db::Database;
use disaster_response_etl::StoredTable;

fn sample_table() -> DataFrame {
    df! {
        "id" => &[2i64, 7],
        "message" => &["Weather update", "Is the Hurricane over?"],
        "genre" => &[Some("direct"), None],
        "related" => &[1i64, 0],
    }
    .expect("Failed to build frame")
}

#[test]
fn test_database_file_is_created() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let mut db = Database::open(&db_path).expect("Failed to create database");
    db.replace_table("disaster_response", &sample_table()).expect("Failed to write table");

    assert!(db_path.exists());
}

#[test]
fn test_table_survives_reopen() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    {
        let mut db = Database::open(&db_path).expect("Failed to create database");
        db.replace_table("disaster_response", &sample_table()).expect("Failed to write table");
    }

    let db = Database::open(&db_path).expect("Failed to reopen database");
    let table = db.read_table("disaster_response").expect("Failed to read table");
    assert_eq!(
        table,
        StoredTable {
            columns: vec!["id".into(), "message".into(), "genre".into(), "related".into()],
            rows: vec![
                vec![
                    Value::Integer(2),
                    Value::Text("Weather update".into()),
                    Value::Text("direct".into()),
                    Value::Integer(1),
                ],
                vec![
                    Value::Integer(7),
                    Value::Text("Is the Hurricane over?".into()),
                    Value::Null,
                    Value::Integer(0),
                ],
            ],
        }
    );
}

#[test]
fn test_column_affinities() {
    let mut db = Database::open_in_memory().expect("Failed to create database");
    let table = df! {
        "id" => &[1i64, 2],
        "score" => &[Some(1.0f64), None],
        "empty" => &[None::<&str>, None],
    }
    .expect("Failed to build frame");

    db.replace_table("scores", &table).expect("Failed to write table");
    let types = db.column_types("scores").expect("Failed to read schema");
    assert_eq!(
        types,
        vec![
            ("id".to_string(), "INTEGER".to_string()),
            ("score".to_string(), "REAL".to_string()),
            ("empty".to_string(), "TEXT".to_string()),
        ]
    );
}

#[test]
fn test_other_tables_are_untouched() {
    let mut db = Database::open_in_memory().expect("Failed to create database");
    db.replace_table("keep_me", &sample_table()).expect("Failed to write table");
    db.replace_table("disaster_response", &sample_table()).expect("Failed to write table");
    db.replace_table("disaster_response", &sample_table()).expect("Failed to rewrite table");

    assert_eq!(db.row_count("keep_me").expect("Failed to count"), 2);
    assert_eq!(db.row_count("disaster_response").expect("Failed to count"), 2);
}

#[test]
fn test_unwritable_destination_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    // a directory cannot be opened as a database file
    let result = Database::open(temp_dir.path())
        .and_then(|mut db| db.replace_table("disaster_response", &sample_table()));
    assert!(result.is_err());
}
