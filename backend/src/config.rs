//! Configuration management for the disaster forecast service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with DFP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Generative model configuration
    pub model: ModelConfig,

    /// Reverse geocoding configuration
    pub geocoding: GeocodingConfig,

    /// Cross-origin configuration
    pub cors: CorsConfig,

    /// Batch result retention
    #[serde(default)]
    pub results: ResultsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,

    /// Bearer token for the model provider
    pub api_key: String,

    /// Model identifier
    pub model: String,

    pub temperature: f32,

    pub top_p: f32,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    pub endpoint: String,

    /// User-Agent sent to the geocoder (required by Nominatim usage policy)
    pub user_agent: String,

    /// Preferred language for place names
    pub language: String,

    /// Lookup timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResultsConfig {
    /// Maximum retained batch results; unbounded when absent
    pub capacity: Option<usize>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("DFP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("model.endpoint", "https://openrouter.ai/api/v1")?
            .set_default("model.api_key", "")?
            .set_default("model.model", "z-ai/glm-4.5-air:free")?
            .set_default("model.temperature", 0.4)?
            .set_default("model.top_p", 0.3)?
            .set_default("model.timeout_secs", 120)?
            .set_default("geocoding.endpoint", "https://nominatim.openstreetmap.org")?
            .set_default("geocoding.user_agent", "disaster_predictor_v2")?
            .set_default("geocoding.language", "en")?
            .set_default("geocoding.timeout_secs", 10)?
            .set_default(
                "cors.allowed_origins",
                vec!["http://localhost:5173", "http://127.0.0.1:8000"],
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DFP prefix)
            .add_source(
                Environment::with_prefix("DFP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
