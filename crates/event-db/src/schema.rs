//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    migrate_legacy_tables(conn)?;
    Ok(())
}

/// Columns added to `applications` after the first deployments.
const LATER_APPLICATION_COLUMNS: &[&str] = &[
    "twitch_user_id",
    "twitch_display_name",
    "twitch_avatar_url",
    "twitch_email",
    "qr_code",
    "updated_at",
];

fn migrate_legacy_tables(conn: &Connection) -> Result<(), DbError> {
    for column in LATER_APPLICATION_COLUMNS {
        if column_exists(conn, "applications", column)? {
            continue;
        }
        tracing::info!(column, "Adding missing column to applications");
        // ADD COLUMN only accepts constant defaults, so these start out NULL.
        conn.execute_batch(&format!("ALTER TABLE applications ADD COLUMN {column} TEXT;"))?;
    }
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .any(|name| name.as_deref() == Ok(column));
    Ok(exists)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    contact TEXT NOT NULL,
    twitch_link TEXT,
    about TEXT,
    status TEXT DEFAULT 'new',
    twitch_user_id TEXT,
    twitch_display_name TEXT,
    twitch_avatar_url TEXT,
    twitch_email TEXT,
    qr_code TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);
CREATE INDEX IF NOT EXISTS idx_applications_created_at ON applications(created_at);

CREATE TABLE IF NOT EXISTS event_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    event_name TEXT,
    event_slogan TEXT,
    event_date TEXT,
    event_location TEXT,
    organizer_name TEXT,
    organizer_contact TEXT,
    program_data TEXT,
    about_content TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);
"#;
