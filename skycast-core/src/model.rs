use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Hours covered by the first forecast day. The hourly view never wraps past
/// this boundary.
pub const HOURS_PER_DAY: usize = 24;

/// A single geolocation fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Conditions observed at the fix location right now.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub weathercode: i32,
    /// Local observation time as reported by the forecast service.
    pub observed_at: NaiveDateTime,
}

/// Hour-by-hour forecast series.
///
/// Parallel arrays with aligned indices; index 0 is midnight of the first
/// forecast day, so hour-of-day doubles as the index within that day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<NaiveDateTime>,
    pub temperature: Vec<f64>,
    pub precipitation_probability: Vec<u8>,
    pub weathercode: Vec<i32>,
}

/// Day-by-day forecast series. Parallel arrays; index 0 is today.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub temp_max: Vec<f64>,
    pub temp_min: Vec<f64>,
    pub sunrise: Vec<NaiveDateTime>,
    pub sunset: Vec<NaiveDateTime>,
    pub weathercode: Vec<i32>,
    pub precipitation_hours: Vec<f64>,
}

/// The complete weather payload for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn aligned(&self) -> bool {
        let n = self.time.len();
        self.temperature.len() == n
            && self.precipitation_probability.len() == n
            && self.weathercode.len() == n
    }
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn aligned(&self) -> bool {
        let n = self.time.len();
        self.temp_max.len() == n
            && self.temp_min.len() == n
            && self.sunrise.len() == n
            && self.sunset.len() == n
            && self.weathercode.len() == n
            && self.precipitation_hours.len() == n
    }
}

impl WeatherSnapshot {
    /// Check the parallel-array invariants the renderer relies on.
    ///
    /// Every per-category array must match its series' time axis in length,
    /// today must be present in the daily series, and the hourly series must
    /// cover the whole first day. A payload failing any of these is treated
    /// as a malformed body.
    pub fn validate(&self) -> Result<(), String> {
        if !self.hourly.aligned() {
            return Err("hourly series arrays have mismatched lengths".to_string());
        }
        if !self.daily.aligned() {
            return Err("daily series arrays have mismatched lengths".to_string());
        }
        if self.daily.is_empty() {
            return Err("daily series contains no days".to_string());
        }
        if self.hourly.len() < HOURS_PER_DAY {
            return Err(format!(
                "hourly series covers only {} hours, expected at least {HOURS_PER_DAY}",
                self.hourly.len()
            ));
        }
        Ok(())
    }
}
