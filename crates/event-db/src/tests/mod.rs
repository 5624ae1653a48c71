use crate::Database;

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

fn application_count(db: &Database) -> i64 {
    db.with_conn(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))?)
    })
    .expect("count applications")
}

mod core;
mod event_settings;
