use tracing_subscriber::EnvFilter;

use kalinga_api::config::ApiConfig;
use kalinga_api::state::AppState;
use kalinga_storage::state::load_snapshot;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let store = match &config.data_file {
        Some(path) => load_snapshot(path)?,
        None => {
            tracing::warn!("KALINGA_DATA_FILE not set, records will not survive a restart");
            Default::default()
        }
    };
    let state = AppState::new(store, config.data_file.clone());
    let app = kalinga_api::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "record store listening");
    axum::serve(listener, app).await?;
    Ok(())
}
