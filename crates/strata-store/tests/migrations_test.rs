// Integration tests for the migration framework

use rusqlite::Connection;
use strata_store::migrations::{applied_migrations, apply_migrations, compute_checksum, get_migrations};

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    names
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = apply_migrations(&mut conn);
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    assert_eq!(get_table_names(&conn), vec!["data_nodes", "schema_version"]);
}

#[test]
fn test_every_embedded_migration_recorded_with_checksum() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    let embedded = get_migrations();
    let applied = applied_migrations(&conn).unwrap();
    assert_eq!(applied.len(), embedded.len());

    for migration in embedded {
        let checksum: String = conn
            .query_row(
                "SELECT checksum FROM schema_version WHERE migration_id = ?",
                [migration.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(checksum, compute_checksum(migration.sql));
    }
}

#[test]
fn test_reapplying_is_idempotent() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count as usize, get_migrations().len());
}

#[test]
fn test_tampered_checksum_is_rejected() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '001_data_nodes'",
        [],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.code(), "ERR_PERSISTENCE");
    assert!(err.message().contains("001_data_nodes"));
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("strata.db");

    {
        let mut conn = Connection::open(&path).unwrap();
        apply_migrations(&mut conn).unwrap();
    }

    let mut conn = Connection::open(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(applied_migrations(&conn).unwrap(), vec!["001_data_nodes"]);
}
