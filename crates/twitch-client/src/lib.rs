//! Twitch OAuth client for the registration flow.
//!
//! Provides authorization URL construction, authorization-code exchange,
//! and the Helix lookup of the authenticated user.

pub mod api;
pub mod auth;

use serde::{Deserialize, Serialize};

/// Scopes requested during authorization.
pub const SCOPES: &[&str] = &["user:read:email"];

/// Token data returned by the authorization-code exchange.
///
/// Nothing in this crate persists it; callers hand it back to the client
/// that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
