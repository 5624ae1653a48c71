//! Twitch Helix REST API client.
//!
//! Injects the Bearer token and Client-Id headers on every request.

mod request;
mod users;

pub mod models;

pub use models::{HelixResponse, TwitchUser};

use crate::{Token, TwitchError};

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Twitch Helix API client with automatic auth header injection.
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) base_url: String,
}
