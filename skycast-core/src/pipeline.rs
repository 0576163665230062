//! The once-per-run pipeline: permission gate → position fix → fetch pair →
//! render.
//!
//! Control flows strictly forward. The two fetches run concurrently and the
//! renderer only fires after both settle; a forecast failure aborts the run
//! while a geocode failure degrades to the fallback city name inside the
//! geocode client.

use chrono::NaiveDateTime;

use crate::error::PipelineError;
use crate::forecast::ForecastClient;
use crate::geocode::GeocodeClient;
use crate::location::{self, LocationProvider};
use crate::render::{self, UiUpdate};

/// Execute one full run and produce the UI updates for it.
///
/// `city_label` short-circuits reverse geocoding when the caller already
/// knows the display name (a configured location override). `now` is the
/// local wall-clock time handed to the renderer.
pub async fn run(
    provider: &dyn LocationProvider,
    forecast: &ForecastClient,
    geocode: &GeocodeClient,
    city_label: Option<&str>,
    now: NaiveDateTime,
) -> Result<Vec<UiUpdate>, PipelineError> {
    let fix = location::acquire_fix(provider).await?;

    let (snapshot, city) = if let Some(label) = city_label {
        (forecast.fetch(&fix).await?, label.to_string())
    } else {
        let (snapshot, city) = tokio::join!(forecast.fetch(&fix), geocode.city_name(&fix));
        (snapshot?, city)
    };

    tracing::info!(%city, "rendering weather view");
    Ok(render::render(&snapshot, &city, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocationError;
    use crate::geocode::UNKNOWN_LOCATION;
    use crate::location::{FixedProvider, PermissionStatus};
    use crate::model::Coordinates;
    use crate::render::UiTarget;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ZURICH: Coordinates = Coordinates {
        latitude: 47.3769,
        longitude: 8.5417,
    };

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time")
    }

    fn forecast_body() -> serde_json::Value {
        let hours: Vec<String> = (0..24).map(|h| format!("2025-03-14T{h:02}:00")).collect();
        json!({
            "current_weather": {
                "temperature": 15.5,
                "weathercode": 3,
                "time": "2025-03-14T09:15"
            },
            "hourly": {
                "time": hours,
                "temperature_2m": vec![14.5; 24],
                "precipitation_probability": vec![35; 24],
                "weathercode": vec![3; 24]
            },
            "daily": {
                "time": ["2025-03-14"],
                "temperature_2m_max": [20.0],
                "temperature_2m_min": [10.0],
                "sunrise": ["2025-03-14T06:12"],
                "sunset": ["2025-03-14T18:47"],
                "weathercode": [3],
                "precipitation_hours": [2.0]
            }
        })
    }

    async fn mount_forecast(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    async fn mount_geocode(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn clients_for(server: &MockServer) -> (ForecastClient, GeocodeClient) {
        (
            ForecastClient::with_base_url(server.uri()),
            GeocodeClient::with_base_url(server.uri()).expect("client should build"),
        )
    }

    fn city_text(updates: &[UiUpdate]) -> Option<String> {
        updates.iter().find_map(|u| match u {
            UiUpdate::Text { target, value } if *target == UiTarget::City => Some(value.clone()),
            _ => None,
        })
    }

    #[tokio::test]
    async fn successful_run_reveals_content() {
        let server = MockServer::start().await;
        mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body())).await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "address": { "city": "Zurich" } })),
        )
        .await;

        let (forecast, geocode) = clients_for(&server);
        let provider = FixedProvider::new(ZURICH);

        let updates = run(&provider, &forecast, &geocode, None, nine_am())
            .await
            .expect("run should succeed");

        assert_eq!(city_text(&updates).as_deref(), Some("Zurich"));
        assert_eq!(updates.last(), Some(&UiUpdate::Hide(UiTarget::Loader)));
    }

    #[tokio::test]
    async fn geocode_failure_degrades_to_fallback_city() {
        let server = MockServer::start().await;
        mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body())).await;
        mount_geocode(&server, ResponseTemplate::new(500)).await;

        let (forecast, geocode) = clients_for(&server);
        let provider = FixedProvider::new(ZURICH);

        let updates = run(&provider, &forecast, &geocode, None, nine_am())
            .await
            .expect("run should still succeed");

        assert_eq!(city_text(&updates).as_deref(), Some(UNKNOWN_LOCATION));
    }

    #[tokio::test]
    async fn forecast_failure_aborts_the_run() {
        let server = MockServer::start().await;
        mount_forecast(&server, ResponseTemplate::new(502)).await;
        mount_geocode(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "address": { "city": "Zurich" } })),
        )
        .await;

        let (forecast, geocode) = clients_for(&server);
        let provider = FixedProvider::new(ZURICH);

        let err = run(&provider, &forecast, &geocode, None, nine_am())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Forecast(_)));
    }

    #[tokio::test]
    async fn denied_permission_blocks_all_fetches() {
        #[derive(Debug)]
        struct Denied;

        #[async_trait]
        impl crate::location::LocationProvider for Denied {
            async fn check_permission(&self) -> Result<PermissionStatus, LocationError> {
                Ok(PermissionStatus::Denied)
            }

            async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
                Ok(PermissionStatus::Denied)
            }

            async fn position(&self) -> Result<Coordinates, LocationError> {
                panic!("position must not be called after a denial");
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(0)
            .mount(&server)
            .await;

        let (forecast, geocode) = clients_for(&server);
        let err = run(&Denied, &forecast, &geocode, None, nine_am())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Location(LocationError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn configured_label_skips_geocoding() {
        let server = MockServer::start().await;
        mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body())).await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (forecast, geocode) = clients_for(&server);
        let provider = FixedProvider::new(ZURICH);

        let updates = run(&provider, &forecast, &geocode, Some("Home"), nine_am())
            .await
            .expect("run should succeed");

        assert_eq!(city_text(&updates).as_deref(), Some("Home"));
    }
}
