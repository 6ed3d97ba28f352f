//! HTTP handlers

pub mod health;
pub mod prediction;

pub use health::health_check;
pub use prediction::{get_result, predict_disaster};
