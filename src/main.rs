use std::time::Duration;

use streamai::{
    api::{create_router, AppState},
    config::Config,
    models::Tab,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Delay before the simulated "New Arrival" notification
const ARRIVAL_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("streamai=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config).await?;

    // First paint: Home rows load while the server comes up
    tokio::spawn(state.orchestrator.set_tab(Tab::Home));
    let arrival = state.notifications.schedule_arrival(ARRIVAL_DELAY);

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "StreamAI listening");

    let served = axum::serve(listener, app).await;
    arrival.abort();
    served?;

    Ok(())
}
