//! Pure view renderer.
//!
//! Maps a weather snapshot plus city name into an ordered list of UI update
//! commands. Adapters (terminal screen, HTML page) apply the commands; this
//! module never touches any UI surface itself.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{DailySeries, HourlySeries, WeatherSnapshot, HOURS_PER_DAY};

/// Icon shown for weathercodes missing from the lookup table.
pub const DEFAULT_ICON: &str = "sun";
/// Background shown for weathercodes missing from the lookup table.
pub const DEFAULT_COLOR: &str = "#D3D3D3";

/// UI surface element addressed by an update command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiTarget {
    Temperature,
    City,
    TempRange,
    UpdateTime,
    WeatherIcon,
    SunriseTime,
    SunsetTime,
    HourlyTable,
    DailyTable,
    Container,
    Loader,
}

/// One UI mutation. Applied in list order by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Replace the text content of a target.
    Text { target: UiTarget, value: String },
    /// Point a target's image at a named icon (single-attribute update).
    Icon { target: UiTarget, name: &'static str },
    /// Replace the hourly table contents.
    Hourly(HourlyTable),
    /// Replace the daily table contents.
    Daily(Vec<DailyRow>),
    /// Repaint the page background.
    Background { color: &'static str },
    Show(UiTarget),
    Hide(UiTarget),
}

/// Hourly view: one metric per row, one column per remaining hour of today.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyTable {
    pub times: Vec<String>,
    pub icons: Vec<&'static str>,
    pub temperatures: Vec<String>,
    pub precipitation: Vec<String>,
}

impl HourlyTable {
    /// Metric rows: time, icon, temperature, precipitation probability.
    pub const ROWS: usize = 4;

    pub fn columns(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// One row of the daily view.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub weekday: String,
    pub precipitation_hours: String,
    pub sunrise: String,
    pub sunset: String,
    pub temp_max: String,
    pub temp_min: String,
}

/// WMO weathercode → icon name. Unknown codes fall back to [`DEFAULT_ICON`].
pub fn icon_for(code: i32) -> &'static str {
    match code {
        0 => "sun",
        1 => "partly-cloudy",
        2 => "cloudy",
        3 => "overcast",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        61 | 63 | 65 => "rain",
        80 | 81 | 82 => "showers",
        95 | 96 | 99 => "storm",
        _ => DEFAULT_ICON,
    }
}

/// WMO weathercode → background color. Unknown codes fall back to
/// [`DEFAULT_COLOR`].
pub fn color_for(code: i32) -> &'static str {
    match code {
        0 => "#87CEEB",
        1 | 2 | 3 => "#B0C4DE",
        45 | 48 => "#778899",
        51 | 53 | 55 | 61 | 63 | 65 => "#708090",
        80 | 81 | 82 => "#87CEFA",
        95 | 96 | 99 => "#2F4F4F",
        _ => DEFAULT_COLOR,
    }
}

/// Round to the nearest whole degree for display, e.g. `15.5` → `"16°"`.
pub fn display_temp(value: f64) -> String {
    format!("{}°", value.round())
}

/// Clock time in the local 2-digit hour:minute AM/PM convention.
pub fn display_clock(value: &NaiveDateTime) -> String {
    value.format("%I:%M %p").to_string()
}

/// Render the full set of UI updates for one successful run.
///
/// `now` is the local wall-clock time of the render; it only determines
/// where the hourly view starts. The reveal commands come last, so a caller
/// that never gets this far leaves the loader untouched.
pub fn render(snapshot: &WeatherSnapshot, city: &str, now: NaiveDateTime) -> Vec<UiUpdate> {
    let current = &snapshot.current;
    let daily = &snapshot.daily;

    let mut updates = vec![
        UiUpdate::Text {
            target: UiTarget::Temperature,
            value: display_temp(current.temperature),
        },
        UiUpdate::Text {
            target: UiTarget::City,
            value: city.to_string(),
        },
    ];

    if let (Some(max), Some(min)) = (daily.temp_max.first(), daily.temp_min.first()) {
        updates.push(UiUpdate::Text {
            target: UiTarget::TempRange,
            value: format!(
                "{}/{} Feels like {}",
                display_temp(*max),
                display_temp(*min),
                display_temp(current.temperature)
            ),
        });
    }

    updates.push(UiUpdate::Text {
        target: UiTarget::UpdateTime,
        value: display_clock(&current.observed_at),
    });
    updates.push(UiUpdate::Icon {
        target: UiTarget::WeatherIcon,
        name: icon_for(current.weathercode),
    });

    if let Some(sunrise) = daily.sunrise.first() {
        updates.push(UiUpdate::Text {
            target: UiTarget::SunriseTime,
            value: display_clock(sunrise),
        });
    }
    if let Some(sunset) = daily.sunset.first() {
        updates.push(UiUpdate::Text {
            target: UiTarget::SunsetTime,
            value: display_clock(sunset),
        });
    }

    updates.push(UiUpdate::Hourly(hourly_table(&snapshot.hourly, now)));
    updates.push(UiUpdate::Daily(daily_rows(daily)));
    updates.push(UiUpdate::Background {
        color: color_for(current.weathercode),
    });

    updates.push(UiUpdate::Show(UiTarget::Container));
    updates.push(UiUpdate::Hide(UiTarget::Loader));

    updates
}

/// Columns run from the current local hour through hour 23, never wrapping
/// into the next day.
pub fn hourly_table(hourly: &HourlySeries, now: NaiveDateTime) -> HourlyTable {
    let start = now.hour() as usize;
    let end = HOURS_PER_DAY.min(hourly.len());

    let mut table = HourlyTable::default();
    for i in start..end {
        let (Some(time), Some(&code), Some(&temperature), Some(&probability)) = (
            hourly.time.get(i),
            hourly.weathercode.get(i),
            hourly.temperature.get(i),
            hourly.precipitation_probability.get(i),
        ) else {
            break;
        };

        table.times.push(display_clock(time));
        table.icons.push(icon_for(code));
        table.temperatures.push(display_temp(temperature));
        table.precipitation.push(format!("{probability}%"));
    }
    table
}

/// One row per forecast day, today first.
pub fn daily_rows(daily: &DailySeries) -> Vec<DailyRow> {
    let mut rows = Vec::with_capacity(daily.len());
    for i in 0..daily.len() {
        let (Some(day), Some(&hours), Some(sunrise), Some(sunset), Some(&max), Some(&min)) = (
            daily.time.get(i),
            daily.precipitation_hours.get(i),
            daily.sunrise.get(i),
            daily.sunset.get(i),
            daily.temp_max.get(i),
            daily.temp_min.get(i),
        ) else {
            break;
        };

        rows.push(DailyRow {
            weekday: day.format("%A").to_string(),
            precipitation_hours: format!("{} h", hours.round()),
            sunrise: display_clock(sunrise),
            sunset: display_clock(sunset),
            temp_max: display_temp(max),
            temp_min: display_temp(min),
        });
    }
    rows
}
