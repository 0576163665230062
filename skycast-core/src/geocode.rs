//! Reverse geocoding: convert a position fix to a human-readable city name.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.
//!
//! This lookup is cosmetic, so every failure degrades to
//! [`UNKNOWN_LOCATION`] instead of aborting the run.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::FetchError;
use crate::model::Coordinates;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
// Nominatim's usage policy requires an identifying User-Agent.
const USER_AGENT: &str = "skycast/0.1 (https://github.com/skycast/skycast)";

/// Sentinel city name shown when no address can be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl GeocodeClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Resolve the city name for a fix, falling back to [`UNKNOWN_LOCATION`].
    pub async fn city_name(&self, coordinates: &Coordinates) -> String {
        match self.resolve(coordinates).await {
            Some(name) => name,
            None => UNKNOWN_LOCATION.to_string(),
        }
    }

    /// Address fields are consulted city → town → village → country.
    async fn resolve(&self, coordinates: &Coordinates) -> Option<String> {
        let url = format!("{}/reverse", self.base_url);

        let response = match self
            .http
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {e}");
                return None;
            }
        };

        let addr = body.address?;
        let place = addr.city.or(addr.town).or(addr.village).or(addr.country)?;

        tracing::info!("Reverse geocoded to: {place}");
        Some(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ZURICH: Coordinates = Coordinates {
        latitude: 47.3769,
        longitude: 8.5417,
    };

    async fn client_for(server: &MockServer) -> GeocodeClient {
        GeocodeClient::with_base_url(server.uri()).expect("client should build")
    }

    async fn mount_address(server: &MockServer, address: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "address": address })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn city_is_preferred() {
        let server = MockServer::start().await;
        mount_address(
            &server,
            json!({ "city": "Zurich", "town": "Altstetten", "country": "Switzerland" }),
        )
        .await;

        let name = client_for(&server).await.city_name(&ZURICH).await;
        assert_eq!(name, "Zurich");
    }

    #[tokio::test]
    async fn town_beats_village_and_country() {
        let server = MockServer::start().await;
        mount_address(
            &server,
            json!({ "town": "Thalwil", "village": "Gattikon", "country": "Switzerland" }),
        )
        .await;

        let name = client_for(&server).await.city_name(&ZURICH).await;
        assert_eq!(name, "Thalwil");
    }

    #[tokio::test]
    async fn country_is_the_last_resort_field() {
        let server = MockServer::start().await;
        mount_address(&server, json!({ "country": "Switzerland" })).await;

        let name = client_for(&server).await.city_name(&ZURICH).await;
        assert_eq!(name, "Switzerland");
    }

    #[tokio::test]
    async fn empty_address_falls_back() {
        let server = MockServer::start().await;
        mount_address(&server, json!({})).await;

        let name = client_for(&server).await.city_name(&ZURICH).await;
        assert_eq!(name, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let name = client_for(&server).await.city_name(&ZURICH).await;
        assert_eq!(name, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let client =
            GeocodeClient::with_base_url("http://127.0.0.1:1").expect("client should build");

        let name = client.city_name(&ZURICH).await;
        assert_eq!(name, UNKNOWN_LOCATION);
    }
}
