//! Terminal adapter: applies renderer update commands to a text screen.
//!
//! The hourly view is transposed for the terminal (one line per hour instead
//! of one column); the update commands themselves stay medium-agnostic.

use std::fmt::Write as _;

use skycast_core::render::{DailyRow, HourlyTable, UiTarget, UiUpdate};

#[derive(Default)]
struct View<'a> {
    temperature: Option<&'a str>,
    city: Option<&'a str>,
    temp_range: Option<&'a str>,
    update_time: Option<&'a str>,
    icon: Option<&'a str>,
    sunrise: Option<&'a str>,
    sunset: Option<&'a str>,
    hourly: Option<&'a HourlyTable>,
    daily: Option<&'a [DailyRow]>,
    revealed: bool,
}

fn collect(updates: &[UiUpdate]) -> View<'_> {
    let mut view = View::default();
    for update in updates {
        match update {
            UiUpdate::Text { target, value } => match target {
                UiTarget::Temperature => view.temperature = Some(value),
                UiTarget::City => view.city = Some(value),
                UiTarget::TempRange => view.temp_range = Some(value),
                UiTarget::UpdateTime => view.update_time = Some(value),
                UiTarget::SunriseTime => view.sunrise = Some(value),
                UiTarget::SunsetTime => view.sunset = Some(value),
                _ => {}
            },
            UiUpdate::Icon { name, .. } => view.icon = Some(name),
            UiUpdate::Hourly(table) => view.hourly = Some(table),
            UiUpdate::Daily(rows) => view.daily = Some(rows),
            // Terminals have no page background to repaint.
            UiUpdate::Background { .. } => {}
            UiUpdate::Show(UiTarget::Container) => view.revealed = true,
            UiUpdate::Show(_) | UiUpdate::Hide(_) => {}
        }
    }
    view
}

/// Compose the terminal screen for a list of update commands.
pub fn draw(updates: &[UiUpdate]) -> String {
    let view = collect(updates);
    if !view.revealed {
        // Without the reveal command the loader stays on screen.
        return "Loading...\n".to_string();
    }

    let mut out = String::new();

    if let Some(city) = view.city {
        let _ = writeln!(out, "{city}");
    }
    match (view.temperature, view.icon) {
        (Some(temperature), Some(icon)) => {
            let _ = writeln!(out, "{temperature}  ({icon})");
        }
        (Some(temperature), None) => {
            let _ = writeln!(out, "{temperature}");
        }
        _ => {}
    }
    if let Some(range) = view.temp_range {
        let _ = writeln!(out, "{range}");
    }
    if let Some(updated) = view.update_time {
        let _ = writeln!(out, "Updated {updated}");
    }
    if let (Some(sunrise), Some(sunset)) = (view.sunrise, view.sunset) {
        let _ = writeln!(out, "Sunrise {sunrise}   Sunset {sunset}");
    }

    if let Some(table) = view.hourly {
        if !table.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Today, hour by hour:");
            let columns = table
                .times
                .iter()
                .zip(&table.icons)
                .zip(&table.temperatures)
                .zip(&table.precipitation);
            for (((time, icon), temperature), precipitation) in columns {
                let _ = writeln!(
                    out,
                    "  {time:<9} {icon:<14} {temperature:>5} {precipitation:>5}"
                );
            }
        }
    }

    if let Some(rows) = view.daily {
        if !rows.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Daily forecast:");
            for row in rows {
                let _ = writeln!(
                    out,
                    "  {:<10} {:>5}  rise {:<9} set {:<9} {:>5} / {:<5}",
                    row.weekday,
                    row.precipitation_hours,
                    row.sunrise,
                    row.sunset,
                    row.temp_max,
                    row.temp_min
                );
            }
        }
    }

    out
}
