//! Reverse geocoding client
//!
//! Converts coordinates to address components using Nominatim (OpenStreetMap).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::Coordinate;
use std::time::Duration;

use crate::config::GeocodingConfig;
use crate::error::{AppError, AppResult, GeocodeError};

/// Address components returned by a reverse lookup; any may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub display_name: Option<String>,
}

/// Coordinate to address lookup
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` means the provider answered but knows nothing about the point
    async fn reverse(&self, coordinate: &Coordinate) -> Result<Option<Address>, GeocodeError>;
}

/// Client for the Nominatim reverse endpoint
#[derive(Clone)]
pub struct NominatimClient {
    http_client: Client,
    base_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    suburb: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimResponse {
    fn into_address(self) -> Option<Address> {
        let address = self.address?;
        Some(Address {
            city: address.city,
            town: address.town,
            village: address.village,
            suburb: address.suburb,
            state: address.state,
            country: address.country,
            display_name: self.display_name,
        })
    }
}

impl NominatimClient {
    /// Create a new client from configuration
    pub fn new(config: &GeocodingConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Configuration(format!("geocoding client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, coordinate: &Coordinate) -> Result<Option<Address>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: NominatimResponse = response.json().await?;
        Ok(body.into_address())
    }
}
