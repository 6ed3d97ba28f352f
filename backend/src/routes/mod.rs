//! Route definitions for the disaster forecast service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/disaster", disaster_routes())
}

/// Disaster prediction routes
fn disaster_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict_disaster))
        .route("/result/:result_id", get(handlers::get_result))
}
