//! Disaster Forecast Service - Backend
//!
//! Accepts batches of coordinates and returns a structured "next likely
//! disaster" forecast for each, produced by reverse geocoding plus a
//! generative model call, then validated.

use axum::{
    http::{HeaderName, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use services::PredictionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub predictions: PredictionService,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(handlers::prediction::RESULT_ID_HEADER)]);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Disaster Forecast API v1.0"
}
