use super::{application_count, test_db};
use crate::{Database, DbError, database_path};

#[test]
fn test_open_and_migrate() {
    let db = test_db();
    assert_eq!(application_count(&db), 0);
}

#[test]
fn test_database_path_forms() {
    assert_eq!(
        database_path("sqlite://data/app.db").unwrap().to_str(),
        Some("data/app.db")
    );
    assert_eq!(database_path("sqlite:app.db").unwrap().to_str(), Some("app.db"));
    assert_eq!(
        database_path(" /var/lib/app.db ").unwrap().to_str(),
        Some("/var/lib/app.db")
    );
    assert!(matches!(database_path("sqlite://"), Err(DbError::InvalidData(_))));
    assert!(matches!(database_path(""), Err(DbError::InvalidData(_))));
}

#[test]
fn test_failed_transaction_rolls_back() {
    let mut db = test_db();
    let result: Result<(), DbError> = db.with_tx(|conn| {
        conn.execute(
            "INSERT INTO applications (name, contact) VALUES ('a', 'b')",
            [],
        )?;
        Err(DbError::InvalidData("abort".into()))
    });

    assert!(result.is_err());
    assert_eq!(application_count(&db), 0);
}

#[test]
fn test_reopen_sees_committed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("reopen.db").display());

    {
        let mut db = Database::open_and_migrate(&url).unwrap();
        db.with_tx(|conn| {
            conn.execute(
                "INSERT INTO applications (name, contact) VALUES ('a', 'b')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
    }

    let db = Database::open(&url).unwrap();
    assert_eq!(application_count(&db), 1);
}
