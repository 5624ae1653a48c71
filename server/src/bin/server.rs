//! Event registration HTTP server.

use tracing_subscriber::EnvFilter;

use event_registration_lib::app::SharedState;
use event_registration_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting event registration server");

    let config = event_registration_lib::init_foundation()?;
    let state = SharedState::new(config);

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );
    server::start_server(state).await
}
