//! Helix response payloads.

use serde::{Deserialize, Serialize};

/// Wrapper for Twitch Helix list responses.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// User information from GET /helix/users.
///
/// Every field is optional so an empty profile serializes as all nulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitchUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
