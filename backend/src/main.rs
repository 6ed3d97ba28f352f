//! Disaster Forecast Service - Backend Server

use disaster_forecast_backend::{create_app, AppState, Config, PredictionService};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dfp_server=debug,disaster_forecast_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Disaster Forecast Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Forecast model: {} via {}", config.model.model, config.model.endpoint);

    let state = AppState {
        predictions: PredictionService::from_config(&config)?,
    };

    let app = create_app(state, &config.cors.allowed_origins);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
