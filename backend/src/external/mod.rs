//! External API integrations

pub mod forecast_model;
pub mod geocoding;

pub use forecast_model::{ChatCompletionClient, ForecastModel, PromptPayload};
pub use geocoding::{Address, NominatimClient, ReverseGeocoder};
