//! Open-Meteo forecast client.
//!
//! Fetches current conditions plus hourly and daily series in one request.
//! See: https://open-meteo.com/en/docs

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::error::FetchError;
use crate::model::{Coordinates, CurrentConditions, DailySeries, HourlySeries, WeatherSnapshot};

const OPEN_METEO_URL: &str = "https://api.open-meteo.com";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weathercode";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,sunrise,sunset,weathercode,precipitation_hours";

/// With `timezone=auto` the service reports naive local timestamps.
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_URL)
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the complete snapshot for one render cycle.
    ///
    /// Any non-success status, malformed body, or broken parallel-array
    /// alignment is a failure; there is no partial result.
    pub async fn fetch(&self, coordinates: &Coordinates) -> Result<WeatherSnapshot, FetchError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OmResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Parse(format!("Failed to parse forecast JSON: {e}")))?;

        let snapshot = snapshot_from(parsed)?;
        snapshot.validate().map_err(FetchError::Parse)?;

        tracing::info!(
            hours = snapshot.hourly.len(),
            days = snapshot.daily.len(),
            "fetched forecast snapshot"
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    weathercode: i32,
    time: String,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    precipitation_probability: Vec<u8>,
    weathercode: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
    weathercode: Vec<i32>,
    precipitation_hours: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: OmCurrentWeather,
    hourly: OmHourly,
    daily: OmDaily,
}

fn snapshot_from(res: OmResponse) -> Result<WeatherSnapshot, FetchError> {
    let current = CurrentConditions {
        temperature: res.current_weather.temperature,
        weathercode: res.current_weather.weathercode,
        observed_at: parse_local(&res.current_weather.time)?,
    };

    let hourly = HourlySeries {
        time: parse_all_local(&res.hourly.time)?,
        temperature: res.hourly.temperature_2m,
        precipitation_probability: res.hourly.precipitation_probability,
        weathercode: res.hourly.weathercode,
    };

    let daily = DailySeries {
        time: parse_all_days(&res.daily.time)?,
        temp_max: res.daily.temperature_2m_max,
        temp_min: res.daily.temperature_2m_min,
        sunrise: parse_all_local(&res.daily.sunrise)?,
        sunset: parse_all_local(&res.daily.sunset)?,
        weathercode: res.daily.weathercode,
        precipitation_hours: res.daily.precipitation_hours,
    };

    Ok(WeatherSnapshot {
        current,
        hourly,
        daily,
    })
}

fn parse_local(value: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(value, LOCAL_TIME_FORMAT)
        .map_err(|e| FetchError::Parse(format!("Bad timestamp '{value}': {e}")))
}

fn parse_all_local(values: &[String]) -> Result<Vec<NaiveDateTime>, FetchError> {
    values.iter().map(|v| parse_local(v)).collect()
}

fn parse_all_days(values: &[String]) -> Result<Vec<NaiveDate>, FetchError> {
    values
        .iter()
        .map(|v| {
            NaiveDate::parse_from_str(v, LOCAL_DATE_FORMAT)
                .map_err(|e| FetchError::Parse(format!("Bad date '{v}': {e}")))
        })
        .collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
