//! Prediction pipeline services

pub mod extraction;
pub mod location;
pub mod prediction;
pub mod prompt;
pub mod store;

pub use location::LocationResolver;
pub use prediction::PredictionService;
pub use store::{InMemoryResultStore, ResultStore};
