//! Event settings: GET returns the current record, PUT merges the fields
//! present in the body into it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use event_db::Database;
use event_db::event_settings::{SettingsPatch, UpsertOutcome};
use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::envelope::{CorsPolicy, HttpMethod, RequestEnvelope, ResponseEnvelope};
use crate::error::{HandlerError, HandlerResult};

use super::body::{double_option, parse_body};

pub const CORS: CorsPolicy = CorsPolicy {
    allow_methods: "GET, PUT, OPTIONS",
    allow_headers: "Content-Type, X-Auth-Token",
};

const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Default, Deserialize)]
struct SettingsBody {
    #[serde(default, deserialize_with = "double_option")]
    event_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    event_slogan: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    event_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    event_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    organizer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    organizer_contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    program_data: Option<Option<Value>>,
    #[serde(default, deserialize_with = "double_option")]
    about_content: Option<Option<String>>,
}

impl SettingsBody {
    fn into_patch(self) -> Result<SettingsPatch, HandlerError> {
        let event_date = match self.event_date {
            Some(Some(raw)) => Some(normalize_event_date(raw)?),
            other => other,
        };
        Ok(SettingsPatch {
            event_name: self.event_name,
            event_slogan: self.event_slogan,
            event_date,
            event_location: self.event_location,
            organizer_name: self.organizer_name,
            organizer_contact: self.organizer_contact,
            program_data: self.program_data,
            about_content: self.about_content,
        })
    }
}

/// Empty clears the date; otherwise the value must be a date, a local
/// datetime or an RFC 3339 timestamp and is stored as sent.
fn normalize_event_date(raw: String) -> Result<Option<String>, HandlerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let valid = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
        || LOCAL_DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).is_ok())
        || DateTime::parse_from_rfc3339(trimmed).is_ok();
    if !valid {
        return Err(HandlerError::bad_request(format!(
            "Invalid event_date: {trimmed}"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

pub fn handle(config: &AppConfig, request: &RequestEnvelope) -> ResponseEnvelope {
    if request.http_method == HttpMethod::Options {
        return ResponseEnvelope::preflight(&CORS);
    }
    route(config, request).unwrap_or_else(HandlerError::into_response)
}

fn route(config: &AppConfig, request: &RequestEnvelope) -> HandlerResult {
    match request.http_method {
        HttpMethod::Get => get_settings(config),
        HttpMethod::Put => {
            let body: SettingsBody = parse_body(request)?;
            update_settings(config, body.into_patch()?)
        }
        _ => Err(HandlerError::MethodNotAllowed),
    }
}

fn get_settings(config: &AppConfig) -> HandlerResult {
    let db = Database::open(&config.database_url)?;
    let settings = db.get_event_settings()?;
    Ok(ResponseEnvelope::json(200, &settings))
}

fn update_settings(config: &AppConfig, patch: SettingsPatch) -> HandlerResult {
    let mut db = Database::open(&config.database_url)?;
    match db.upsert_event_settings(&patch)? {
        UpsertOutcome::Inserted => tracing::info!("Event settings created"),
        UpsertOutcome::Updated => tracing::info!("Event settings updated"),
    }
    Ok(ResponseEnvelope::message(200, "Settings updated successfully"))
}
