//! Location resolver
//!
//! Maps a coordinate to a best-effort place name. Never fails: geocoder errors
//! and empty answers degrade to the coordinate-based fallback location.

use shared::{Coordinate, ResolvedLocation, UNKNOWN};
use std::sync::Arc;

use crate::external::{Address, ReverseGeocoder};

/// Resolver service wrapping a reverse geocoder
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Resolve a coordinate to a place
    pub async fn resolve(&self, coordinate: &Coordinate) -> ResolvedLocation {
        tracing::debug!("Identifying location for coordinates {}", coordinate);

        match self.geocoder.reverse(coordinate).await {
            Ok(Some(address)) => {
                let location = from_address(coordinate, address);
                tracing::debug!("Location identified: {}", location.display_name);
                location
            }
            Ok(None) => {
                tracing::debug!("No address for {}, using coordinates only", coordinate);
                ResolvedLocation::fallback(coordinate)
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for {}: {}. Using coordinates only", coordinate, e);
                ResolvedLocation::fallback(coordinate)
            }
        }
    }
}

/// Build a location from address parts, preferring city > town > village > suburb
fn from_address(coordinate: &Coordinate, address: Address) -> ResolvedLocation {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let place = present(address.city)
        .or_else(|| present(address.town))
        .or_else(|| present(address.village))
        .or_else(|| present(address.suburb))
        .unwrap_or_else(|| UNKNOWN.to_string());

    ResolvedLocation {
        place,
        state: present(address.state).unwrap_or_else(|| UNKNOWN.to_string()),
        country: present(address.country).unwrap_or_else(|| UNKNOWN.to_string()),
        display_name: present(address.display_name)
            .unwrap_or_else(|| ResolvedLocation::fallback(coordinate).display_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodeError;
    use async_trait::async_trait;

    struct FixedGeocoder(Option<Address>);

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn reverse(&self, _: &Coordinate) -> Result<Option<Address>, GeocodeError> {
            Ok(self.0.clone())
        }
    }

    struct TimedOutGeocoder;

    #[async_trait]
    impl ReverseGeocoder for TimedOutGeocoder {
        async fn reverse(&self, _: &Coordinate) -> Result<Option<Address>, GeocodeError> {
            Err(GeocodeError::Timeout)
        }
    }

    fn coord() -> Coordinate {
        Coordinate::new(27.7172, 85.324)
    }

    #[tokio::test]
    async fn test_prefers_city() {
        let resolver = LocationResolver::new(Arc::new(FixedGeocoder(Some(Address {
            city: Some("Kathmandu".to_string()),
            town: Some("Ignored Town".to_string()),
            state: Some("Bagmati Province".to_string()),
            country: Some("Nepal".to_string()),
            display_name: Some("Kathmandu, Bagmati Province, Nepal".to_string()),
            ..Address::default()
        }))));

        let location = resolver.resolve(&coord()).await;
        assert_eq!(location.place, "Kathmandu");
        assert_eq!(location.state, "Bagmati Province");
        assert_eq!(location.country, "Nepal");
        assert_eq!(location.display_name, "Kathmandu, Bagmati Province, Nepal");
    }

    #[tokio::test]
    async fn test_granularity_order() {
        let resolver = LocationResolver::new(Arc::new(FixedGeocoder(Some(Address {
            city: Some("".to_string()),
            village: Some("Khumjung".to_string()),
            suburb: Some("Ignored Suburb".to_string()),
            ..Address::default()
        }))));

        let location = resolver.resolve(&coord()).await;
        assert_eq!(location.place, "Khumjung");
        assert_eq!(location.state, "Unknown");
        assert_eq!(location.country, "Unknown");
        assert_eq!(location.display_name, "Location at 27.7172, 85.324");
    }

    #[tokio::test]
    async fn test_no_place_component_is_unknown() {
        let resolver = LocationResolver::new(Arc::new(FixedGeocoder(Some(Address {
            country: Some("Nepal".to_string()),
            ..Address::default()
        }))));

        assert_eq!(resolver.resolve(&coord()).await.place, "Unknown");
    }

    #[tokio::test]
    async fn test_empty_answer_falls_back() {
        let resolver = LocationResolver::new(Arc::new(FixedGeocoder(None)));
        assert_eq!(
            resolver.resolve(&coord()).await,
            ResolvedLocation::fallback(&coord())
        );
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let resolver = LocationResolver::new(Arc::new(TimedOutGeocoder));
        let location = resolver.resolve(&coord()).await;
        assert_eq!(location.place, "Coordinates: 27.7172, 85.324");
        assert_eq!(location.state, "Unknown");
        assert_eq!(location.country, "Unknown");
    }
}
