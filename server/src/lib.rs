//! Event registration backend: envelope handlers for applications, event
//! settings and Twitch login, plus an axum server in front of them.

pub mod app;
pub mod config;
pub mod envelope;
pub mod error;
pub mod server;

use event_db::Database;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load config and create or upgrade the database schema.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::from_env()?;

    tracing::info!("Preparing database at {}", config.database_url);
    // Dropped right away; handlers open their own connections.
    Database::open_and_migrate(&config.database_url)?;

    if !config.twitch.is_configured() {
        tracing::warn!("TWITCH_CLIENT_ID or TWITCH_CLIENT_SECRET is not set; Twitch login will fail");
    }

    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok(config)
}
