//! Participant registrations.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::update::{Column, UpdateBuilder};
use crate::{Database, DbError, timestamp};

/// Status every application starts in.
pub const STATUS_NEW: &str = "new";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub twitch_link: Option<String>,
    pub about: Option<String>,
    pub status: Option<String>,
    pub twitch_user_id: Option<String>,
    pub twitch_display_name: Option<String>,
    pub twitch_avatar_url: Option<String>,
    pub twitch_email: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// List view of an application: no `about`, no `qr_code`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationSummary {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub twitch_display_name: Option<String>,
    pub twitch_avatar_url: Option<String>,
}

/// Summaries plus the unfiltered row count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationList {
    pub applications: Vec<ApplicationSummary>,
    pub total: i64,
}

/// Twitch profile fields copied onto the application at registration time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwitchSnapshot {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub name: String,
    pub contact: String,
    pub twitch_link: Option<String>,
    pub about: Option<String>,
    pub twitch: TwitchSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedApplication {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// Columns an application may change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationColumn {
    Status,
    QrCode,
}

impl Column for ApplicationColumn {
    const TABLE: &'static str = "applications";

    fn name(self) -> &'static str {
        match self {
            ApplicationColumn::Status => "status",
            ApplicationColumn::QrCode => "qr_code",
        }
    }
}

/// Partial update. The outer `Option` is presence, the inner one nullability:
/// `Some(None)` clears the column, `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub status: Option<Option<String>>,
    pub qr_code: Option<Option<String>>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.qr_code.is_none()
    }

    fn assignments(&self) -> UpdateBuilder<ApplicationColumn> {
        let mut builder = UpdateBuilder::new();
        if let Some(status) = &self.status {
            builder.set(ApplicationColumn::Status, status.clone());
        }
        if let Some(qr_code) = &self.qr_code {
            builder.set(ApplicationColumn::QrCode, qr_code.clone());
        }
        builder
    }
}

const APPLICATION_COLUMNS: &str = "id, name, contact, twitch_link, about, status,
     twitch_user_id, twitch_display_name, twitch_avatar_url, twitch_email,
     qr_code, created_at, updated_at";

const SUMMARY_COLUMNS: &str =
    "id, name, contact, status, created_at, twitch_display_name, twitch_avatar_url";

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        twitch_link: row.get(3)?,
        about: row.get(4)?,
        status: row.get(5)?,
        twitch_user_id: row.get(6)?,
        twitch_display_name: row.get(7)?,
        twitch_avatar_url: row.get(8)?,
        twitch_email: row.get(9)?,
        qr_code: row.get(10)?,
        created_at: timestamp::column(row, 11)?,
        updated_at: timestamp::column(row, 12)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<ApplicationSummary> {
    Ok(ApplicationSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        status: row.get(3)?,
        created_at: timestamp::column(row, 4)?,
        twitch_display_name: row.get(5)?,
        twitch_avatar_url: row.get(6)?,
    })
}

impl Database {
    /// Insert a new application with status [`STATUS_NEW`].
    pub fn insert_application(
        &mut self,
        app: &NewApplication,
    ) -> Result<CreatedApplication, DbError> {
        if app.name.is_empty() || app.contact.is_empty() {
            return Err(DbError::InvalidData("name and contact are required".into()));
        }
        let created_at = timestamp::now();
        let stamp = timestamp::to_db(&created_at);

        self.with_tx(|conn| {
            conn.execute(
                "INSERT INTO applications (
                    name, contact, twitch_link, about, status,
                    twitch_user_id, twitch_display_name, twitch_avatar_url, twitch_email,
                    created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                rusqlite::params![
                    app.name,
                    app.contact,
                    app.twitch_link,
                    app.about,
                    STATUS_NEW,
                    app.twitch.user_id,
                    app.twitch.display_name,
                    app.twitch.avatar_url,
                    app.twitch.email,
                    stamp,
                ],
            )?;
            Ok(CreatedApplication {
                id: conn.last_insert_rowid(),
                created_at,
            })
        })
    }

    pub fn get_application(&self, id: i64) -> Result<Option<Application>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?1"
            ))?;
            let app = stmt.query_row([id], application_from_row).optional()?;
            Ok(app)
        })
    }

    /// Newest first, optionally filtered by exact status. `total` always
    /// counts every row regardless of the filter.
    ///
    /// Ordered by `julianday` so RFC 3339 rows and `CURRENT_TIMESTAMP` rows
    /// compare by instant, not by text.
    pub fn list_applications(&mut self, status: Option<&str>) -> Result<ApplicationList, DbError> {
        self.with_snapshot(|conn| {
            let applications = match status {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SUMMARY_COLUMNS} FROM applications
                         WHERE status = ?1
                         ORDER BY julianday(created_at) DESC, id DESC"
                    ))?;
                    stmt.query_map([status], summary_from_row)?
                        .collect::<Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SUMMARY_COLUMNS} FROM applications
                         ORDER BY julianday(created_at) DESC, id DESC"
                    ))?;
                    stmt.query_map([], summary_from_row)?
                        .collect::<Result<Vec<_>, _>>()?
                }
            };
            let total = conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))?;
            Ok(ApplicationList {
                applications,
                total,
            })
        })
    }

    /// Apply a partial update and bump `updated_at`.
    ///
    /// Fails with [`DbError::InvalidData`] for an empty patch and
    /// [`DbError::NotFound`] when no row has `id`.
    pub fn update_application(&mut self, id: i64, patch: &ApplicationPatch) -> Result<(), DbError> {
        if patch.is_empty() {
            return Err(DbError::InvalidData("no fields to update".into()));
        }
        let builder = patch.assignments();
        let changed = self.with_tx(|conn| builder.execute(conn, &timestamp::now(), id))?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("application {id}")));
        }
        Ok(())
    }
}
