//! Event display settings, stored as a single row with id 1.

use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::update::{Column, UpdateBuilder};
use crate::{Database, DbError, timestamp};

pub const DEFAULT_EVENT_NAME: &str = "42 БРАТУХ";

const SETTINGS_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventSettings {
    pub event_name: Option<String>,
    pub event_slogan: Option<String>,
    pub event_date: Option<String>,
    pub event_location: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub program_data: Option<Value>,
    pub about_content: Option<String>,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            event_name: Some(DEFAULT_EVENT_NAME.to_string()),
            event_slogan: None,
            event_date: None,
            event_location: None,
            organizer_name: None,
            organizer_contact: None,
            program_data: None,
            about_content: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsColumn {
    EventName,
    EventSlogan,
    EventDate,
    EventLocation,
    OrganizerName,
    OrganizerContact,
    ProgramData,
    AboutContent,
}

impl Column for SettingsColumn {
    const TABLE: &'static str = "event_settings";

    fn name(self) -> &'static str {
        match self {
            SettingsColumn::EventName => "event_name",
            SettingsColumn::EventSlogan => "event_slogan",
            SettingsColumn::EventDate => "event_date",
            SettingsColumn::EventLocation => "event_location",
            SettingsColumn::OrganizerName => "organizer_name",
            SettingsColumn::OrganizerContact => "organizer_contact",
            SettingsColumn::ProgramData => "program_data",
            SettingsColumn::AboutContent => "about_content",
        }
    }
}

/// Partial settings write. Same presence/nullability convention as
/// [`crate::applications::ApplicationPatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub event_name: Option<Option<String>>,
    pub event_slogan: Option<Option<String>>,
    pub event_date: Option<Option<String>>,
    pub event_location: Option<Option<String>>,
    pub organizer_name: Option<Option<String>>,
    pub organizer_contact: Option<Option<String>>,
    pub program_data: Option<Option<Value>>,
    pub about_content: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl SettingsPatch {
    /// Overlay the present fields onto `settings`.
    pub fn apply_to(&self, settings: &mut EventSettings) {
        fn overlay<T: Clone>(slot: &mut Option<T>, patch: &Option<Option<T>>) {
            if let Some(value) = patch {
                *slot = value.clone();
            }
        }
        overlay(&mut settings.event_name, &self.event_name);
        overlay(&mut settings.event_slogan, &self.event_slogan);
        overlay(&mut settings.event_date, &self.event_date);
        overlay(&mut settings.event_location, &self.event_location);
        overlay(&mut settings.organizer_name, &self.organizer_name);
        overlay(&mut settings.organizer_contact, &self.organizer_contact);
        overlay(&mut settings.program_data, &self.program_data);
        overlay(&mut settings.about_content, &self.about_content);
    }

    fn assignments(&self) -> Result<UpdateBuilder<SettingsColumn>, DbError> {
        let mut builder = UpdateBuilder::new();
        let text_fields = [
            (SettingsColumn::EventName, &self.event_name),
            (SettingsColumn::EventSlogan, &self.event_slogan),
            (SettingsColumn::EventDate, &self.event_date),
            (SettingsColumn::EventLocation, &self.event_location),
            (SettingsColumn::OrganizerName, &self.organizer_name),
            (SettingsColumn::OrganizerContact, &self.organizer_contact),
            (SettingsColumn::AboutContent, &self.about_content),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                builder.set(column, value.clone());
            }
        }
        if let Some(program) = &self.program_data {
            builder.set(SettingsColumn::ProgramData, program_data_to_db(program.as_ref())?);
        }
        Ok(builder)
    }
}

/// JSON `null` is stored as SQL NULL; anything else as its JSON text.
fn program_data_to_db(value: Option<&Value>) -> Result<Option<String>, DbError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::to_string(value)?)),
    }
}

/// Stored text that is not valid JSON comes back as a JSON string.
fn program_data_from_db(raw: Option<String>) -> Option<Value> {
    raw.map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
}

fn settings_from_row(row: &Row<'_>) -> rusqlite::Result<EventSettings> {
    Ok(EventSettings {
        event_name: row.get(0)?,
        event_slogan: row.get(1)?,
        event_date: row.get(2)?,
        event_location: row.get(3)?,
        organizer_name: row.get(4)?,
        organizer_contact: row.get(5)?,
        program_data: program_data_from_db(row.get(6)?),
        about_content: row.get(7)?,
    })
}

impl Database {
    /// Current settings, or [`EventSettings::default`] before the first write.
    pub fn get_event_settings(&self) -> Result<EventSettings, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT event_name, event_slogan, event_date, event_location,
                        organizer_name, organizer_contact, program_data, about_content
                 FROM event_settings
                 WHERE id = ?1",
            )?;
            let settings = stmt.query_row([SETTINGS_ID], settings_from_row).optional()?;
            Ok(settings.unwrap_or_default())
        })
    }

    /// Insert the record on first write, otherwise update only the present
    /// fields. `updated_at` is stamped either way.
    pub fn upsert_event_settings(&mut self, patch: &SettingsPatch) -> Result<UpsertOutcome, DbError> {
        let builder = patch.assignments()?;
        let now = timestamp::now();

        self.with_tx(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM event_settings WHERE id = ?1)",
                [SETTINGS_ID],
                |row| row.get(0),
            )?;

            if exists {
                builder.execute(conn, &now, SETTINGS_ID)?;
                return Ok(UpsertOutcome::Updated);
            }

            let mut settings = EventSettings::default();
            patch.apply_to(&mut settings);
            let stamp = timestamp::to_db(&now);
            conn.execute(
                "INSERT INTO event_settings (
                    id, event_name, event_slogan, event_date, event_location,
                    organizer_name, organizer_contact, program_data, about_content,
                    created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                rusqlite::params![
                    SETTINGS_ID,
                    settings.event_name,
                    settings.event_slogan,
                    settings.event_date,
                    settings.event_location,
                    settings.organizer_name,
                    settings.organizer_contact,
                    program_data_to_db(settings.program_data.as_ref())?,
                    settings.about_content,
                    stamp,
                ],
            )?;
            Ok(UpsertOutcome::Inserted)
        })
    }
}
