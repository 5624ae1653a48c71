//! Runtime configuration read once at startup.

use super::defaults;
use super::validation::{validate_database_url, validate_redirect_uri};

/// Process-wide settings, built once and passed by reference to handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub server_port: u16,
    pub twitch: TwitchConfig,
}

/// OAuth client credentials and endpoints.
#[derive(Clone, PartialEq)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Overrides the Twitch token endpoint.
    pub token_url: Option<String>,
    /// Overrides the Helix API base URL.
    pub helix_base_url: Option<String>,
}

impl std::fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("helix_base_url", &self.helix_base_url)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.into(),
            server_port: defaults::SERVER_PORT,
            twitch: TwitchConfig {
                client_id: String::new(),
                client_secret: String::new(),
                redirect_uri: defaults::REDIRECT_URI.into(),
                token_url: None,
                helix_base_url: None,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match g("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a port number, got {raw:?}"))?,
            None => defaults::SERVER_PORT,
        };

        let config = Self {
            database_url: g("DATABASE_URL").unwrap_or_else(|| defaults::DATABASE_URL.into()),
            server_port,
            twitch: TwitchConfig {
                client_id: g("TWITCH_CLIENT_ID").unwrap_or_default(),
                client_secret: g("TWITCH_CLIENT_SECRET").unwrap_or_default(),
                redirect_uri: g("REDIRECT_URI").unwrap_or_else(|| defaults::REDIRECT_URI.into()),
                token_url: g("TWITCH_TOKEN_URL"),
                helix_base_url: g("TWITCH_HELIX_URL"),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validate_database_url(&self.database_url)
            .map_err(|e| anyhow::anyhow!("DATABASE_URL: {e}"))?;
        validate_redirect_uri(&self.twitch.redirect_uri)
            .map_err(|e| anyhow::anyhow!("REDIRECT_URI: {e}"))?;
        Ok(())
    }
}

impl TwitchConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, anyhow::Error> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.twitch.is_configured());
    }

    #[test]
    fn reads_all_keys() {
        let config = load(&[
            ("DATABASE_URL", "sqlite:///tmp/events.db"),
            ("SERVER_PORT", "9000"),
            ("TWITCH_CLIENT_ID", "cid"),
            ("TWITCH_CLIENT_SECRET", "secret"),
            ("REDIRECT_URI", "https://events.example.com/auth/callback"),
            ("TWITCH_TOKEN_URL", "http://127.0.0.1:1/token"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite:///tmp/events.db");
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.twitch.client_id, "cid");
        assert_eq!(config.twitch.redirect_uri, "https://events.example.com/auth/callback");
        assert_eq!(config.twitch.token_url.as_deref(), Some("http://127.0.0.1:1/token"));
        assert!(config.twitch.helix_base_url.is_none());
        assert!(config.twitch.is_configured());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("DATABASE_URL", "  "), ("SERVER_PORT", "")]).unwrap();
        assert_eq!(config.database_url, defaults::DATABASE_URL);
        assert_eq!(config.server_port, defaults::SERVER_PORT);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(load(&[("SERVER_PORT", "70000")]).is_err());
        assert!(load(&[("SERVER_PORT", "http")]).is_err());
    }

    #[test]
    fn rejects_relative_redirect_uri() {
        assert!(load(&[("REDIRECT_URI", "/auth/callback")]).is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = load(&[("TWITCH_CLIENT_SECRET", "hunter2")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
