//! Envelope handlers, one per function.

pub mod applications;
pub mod settings;
pub mod twitch_auth;

mod body;

use crate::config::AppConfig;
use crate::envelope::{RequestEnvelope, ResponseEnvelope};

/// The deployable functions, addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Applications,
    Settings,
    TwitchAuth,
}

impl Function {
    pub const ALL: [Function; 3] = [
        Function::Applications,
        Function::Settings,
        Function::TwitchAuth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Applications => "applications",
            Function::Settings => "settings",
            Function::TwitchAuth => "twitch-auth",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Route an envelope to the handler for `function`.
pub async fn dispatch(
    function: Function,
    config: &AppConfig,
    request: &RequestEnvelope,
) -> ResponseEnvelope {
    tracing::debug!(function = function.name(), method = %request.http_method, "Dispatching request");
    match function {
        Function::Applications => applications::handle(config, request),
        Function::Settings => settings::handle(config, request),
        Function::TwitchAuth => twitch_auth::handle(config, request).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use crate::config::AppConfig;

    /// A config whose database lives in a fresh temporary directory.
    ///
    /// Keep the `TempDir` alive for the duration of the test.
    pub fn temp_config() -> (TempDir, AppConfig) {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite://{}", dir.path().join("events.db").display());
        event_db::Database::open_and_migrate(&url).expect("migrate test db");
        let config = AppConfig {
            database_url: url,
            ..AppConfig::default()
        };
        (dir, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_names_round_trip() {
        for function in Function::ALL {
            assert_eq!(Function::from_name(function.name()), Some(function));
        }
        assert_eq!(Function::from_name("users"), None);
    }
}
