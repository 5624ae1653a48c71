//! Participant registrations:
//!   GET  ?id=N          – one application
//!   GET  [?status=S]    – summaries, newest first, plus unfiltered total
//!   POST                – create (status starts as "new")
//!   PUT                 – change status and/or qr_code

use event_db::applications::{ApplicationPatch, NewApplication, TwitchSnapshot};
use event_db::{Database, DbError};
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::envelope::{CorsPolicy, HttpMethod, RequestEnvelope, ResponseEnvelope};
use crate::error::{HandlerError, HandlerResult};

use super::body::{double_option, parse_body};

pub const CORS: CorsPolicy = CorsPolicy {
    allow_methods: "GET, POST, PUT, DELETE, OPTIONS",
    allow_headers: "Content-Type, X-Auth-Token",
};

const NOT_FOUND: &str = "Application not found";

#[derive(Debug, Default, Deserialize)]
struct CreateApplicationBody {
    name: Option<String>,
    contact: Option<String>,
    twitch_link: Option<String>,
    about: Option<String>,
    #[serde(default)]
    twitch_user: Option<TwitchUserBody>,
}

/// Profile snapshot as returned by the twitch-auth callback.
#[derive(Debug, Default, Deserialize)]
struct TwitchUserBody {
    id: Option<String>,
    display_name: Option<String>,
    profile_image_url: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateApplicationBody {
    #[serde(default)]
    id: Option<ApplicationId>,
    #[serde(default, deserialize_with = "double_option")]
    status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    qr_code: Option<Option<String>>,
}

/// Clients send the id either as a number or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApplicationId {
    Number(i64),
    Text(String),
}

pub fn handle(config: &AppConfig, request: &RequestEnvelope) -> ResponseEnvelope {
    if request.http_method == HttpMethod::Options {
        return ResponseEnvelope::preflight(&CORS);
    }
    route(config, request).unwrap_or_else(HandlerError::into_response)
}

fn route(config: &AppConfig, request: &RequestEnvelope) -> HandlerResult {
    match request.http_method {
        HttpMethod::Get => match request.query("id") {
            Some(id) => get_application(config, id),
            None => list_applications(config, request.query("status")),
        },
        HttpMethod::Post => create_application(config, parse_body(request)?),
        HttpMethod::Put => update_application(config, parse_body(request)?),
        _ => Err(HandlerError::MethodNotAllowed),
    }
}

/// An id that is not an integer cannot match any row.
fn parse_id(raw: &str) -> Result<i64, HandlerError> {
    raw.trim()
        .parse()
        .map_err(|_| HandlerError::not_found(NOT_FOUND))
}

fn get_application(config: &AppConfig, raw_id: &str) -> HandlerResult {
    let id = parse_id(raw_id)?;
    let db = Database::open(&config.database_url)?;
    let app = db
        .get_application(id)?
        .ok_or_else(|| HandlerError::not_found(NOT_FOUND))?;
    Ok(ResponseEnvelope::json(200, &app))
}

fn list_applications(config: &AppConfig, status: Option<&str>) -> HandlerResult {
    let mut db = Database::open(&config.database_url)?;
    let list = db.list_applications(status)?;
    Ok(ResponseEnvelope::json(200, &list))
}

fn create_application(config: &AppConfig, body: CreateApplicationBody) -> HandlerResult {
    let name = body.name.filter(|s| !s.is_empty());
    let contact = body.contact.filter(|s| !s.is_empty());
    let (Some(name), Some(contact)) = (name, contact) else {
        return Err(HandlerError::bad_request("Name and contact are required"));
    };

    let twitch = body.twitch_user.unwrap_or_default();
    let new_app = NewApplication {
        name,
        contact,
        twitch_link: body.twitch_link,
        about: body.about,
        twitch: TwitchSnapshot {
            user_id: twitch.id,
            display_name: twitch.display_name,
            avatar_url: twitch.profile_image_url,
            email: twitch.email,
        },
    };

    let mut db = Database::open(&config.database_url)?;
    let created = db.insert_application(&new_app)?;
    tracing::info!(id = created.id, "Application created");

    Ok(ResponseEnvelope::json(
        201,
        &json!({
            "id": created.id,
            "message": "Application created successfully",
            "created_at": created.created_at,
        }),
    ))
}

fn update_application(config: &AppConfig, body: UpdateApplicationBody) -> HandlerResult {
    let id = match body.id {
        None | Some(ApplicationId::Number(0)) => None,
        Some(ApplicationId::Text(ref raw)) if raw.trim().is_empty() => None,
        Some(id) => Some(id),
    };
    let Some(id) = id else {
        return Err(HandlerError::bad_request("Application ID is required"));
    };

    let patch = ApplicationPatch {
        status: body.status,
        qr_code: body.qr_code,
    };
    if patch.is_empty() {
        return Err(HandlerError::bad_request("No fields to update"));
    }

    let id = match id {
        ApplicationId::Number(id) => id,
        ApplicationId::Text(raw) => parse_id(&raw)?,
    };

    let mut db = Database::open(&config.database_url)?;
    match db.update_application(id, &patch) {
        Ok(()) => {}
        Err(DbError::NotFound(_)) => return Err(HandlerError::not_found(NOT_FOUND)),
        Err(e) => return Err(e.into()),
    }
    tracing::info!(id, "Application updated");

    Ok(ResponseEnvelope::message(200, "Application updated successfully"))
}
