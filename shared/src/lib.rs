//! Shared types and models for the disaster forecast service
//!
//! This crate holds the forecast data model and the pure validation rules
//! applied to every prediction, independent of any transport or provider.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
