//! OAuth authorization-code flow for Twitch.
//!
//! Handles authorization URL generation and exchanging the returned code
//! for an access token.

use serde::Deserialize;
use url::Url;

use crate::{SCOPES, Token, TwitchError};

const AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";
const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client credentials plus the redirect URI registered with Twitch.
pub struct TwitchAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    http: reqwest::Client,
}

impl TwitchAuth {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            token_url: TOKEN_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the code exchange at another token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Build the authorization URL. Pure string construction, no network.
    ///
    /// `state` is forwarded verbatim when given so the caller can match it
    /// against the callback.
    pub fn get_auth_url(&self, state: Option<&str>) -> Result<String, TwitchError> {
        let scope_str = SCOPES.join(" ");
        let mut url = Url::parse(AUTHORIZE_URL)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", &self.redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &scope_str);
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, TwitchError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let resp = self.http.post(&self.token_url).form(&params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Twitch token endpoint rejected code");
            return Err(TwitchError::TokenExchangeFailed(describe_error(
                status.as_u16(),
                &body,
            )));
        }

        parse_token(&body)
    }
}

fn parse_token(body: &str) -> Result<Token, TwitchError> {
    serde_json::from_str(body)
        .map_err(|e| TwitchError::TokenExchangeFailed(format!("failed to parse response: {e}")))
}

fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => {
            let reason = err.error.unwrap_or_else(|| status.to_string());
            let detail = err
                .message
                .or(err.error_description)
                .unwrap_or_else(|| body.to_string());
            format!("{reason}: {detail}")
        }
        Err(_) => format!("{status}: {body}"),
    }
}
