//! Network positioning via IP lookup.
//!
//! Used when no coordinates are configured. Network positioning happens
//! entirely over HTTP, so the permission gate reports `Granted` without a
//! prompt.

use super::{LocationProvider, PermissionStatus};
use crate::{error::LocationError, model::Coordinates};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GEOIP_URL: &str = "http://ip-api.com/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GeoIpProvider {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl GeoIpProvider {
    pub fn new() -> Result<Self, LocationError> {
        Self::with_base_url(GEOIP_URL)
    }

    /// Point the lookup at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LocationError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl LocationProvider for GeoIpProvider {
    async fn check_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn position(&self) -> Result<Coordinates, LocationError> {
        let res = match self.http.get(&self.base_url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("GeoIP request failed: {e}");
                return Err(LocationError::ServiceUnavailable);
            }
        };

        if !res.status().is_success() {
            tracing::debug!("GeoIP request returned status {}", res.status());
            return Err(LocationError::ServiceUnavailable);
        }

        let body: GeoIpResponse = res
            .json()
            .await
            .map_err(|e| LocationError::Other(format!("Malformed GeoIP response: {e}")))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "unknown reason".to_string());
            return Err(LocationError::Other(format!("GeoIP lookup failed: {reason}")));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LocationError::Other(
                "GeoIP response missing coordinates".to_string(),
            )),
        }
    }
}
