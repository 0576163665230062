//! Static HTML adapter.
//!
//! Substitutes renderer output into a fixed page template. Table contents
//! become `<tr>/<td>` strings; everything else fills a named placeholder.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use skycast_core::render::{DailyRow, HourlyTable, UiTarget, UiUpdate};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>skycast</title>
</head>
<body style="background-color: {{background}}">
  <main class="container">
    <p class="city">{{city}}</p>
    <p class="temperature">{{temperature}}</p>
    <p class="temp-range">{{temp_range}}</p>
    <p class="update-time">{{update_time}}</p>
    <img class="weather-icon" src="./img/{{icon}}.png" />
    <p class="sun-times">
      <span class="sunrise-time">{{sunrise}}</span>
      <span class="sunset-time">{{sunset}}</span>
    </p>
    <div class="head2"><table>{{hourly_rows}}</table></div>
    <table class="daily-table">{{daily_rows}}</table>
  </main>
</body>
</html>
"#;

/// Render the page and write it to `path`.
pub fn write_page(updates: &[UiUpdate], path: &Path) -> Result<()> {
    fs::write(path, render_page(updates))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Fill the fixed template from a list of update commands.
pub fn render_page(updates: &[UiUpdate]) -> String {
    let mut page = TEMPLATE.to_string();

    let mut fill = |placeholder: &str, value: &str| {
        page = page.replace(placeholder, value);
    };

    for update in updates {
        match update {
            UiUpdate::Text { target, value } => {
                let placeholder = match target {
                    UiTarget::Temperature => "{{temperature}}",
                    UiTarget::City => "{{city}}",
                    UiTarget::TempRange => "{{temp_range}}",
                    UiTarget::UpdateTime => "{{update_time}}",
                    UiTarget::SunriseTime => "{{sunrise}}",
                    UiTarget::SunsetTime => "{{sunset}}",
                    _ => continue,
                };
                fill(placeholder, &escape(value));
            }
            UiUpdate::Icon { name, .. } => fill("{{icon}}", name),
            UiUpdate::Hourly(table) => fill("{{hourly_rows}}", &hourly_rows(table)),
            UiUpdate::Daily(rows) => fill("{{daily_rows}}", &daily_rows(rows)),
            UiUpdate::Background { color } => fill("{{background}}", color),
            UiUpdate::Show(_) | UiUpdate::Hide(_) => {}
        }
    }

    // Blank anything the update list did not cover.
    for placeholder in [
        "{{temperature}}",
        "{{city}}",
        "{{temp_range}}",
        "{{update_time}}",
        "{{icon}}",
        "{{sunrise}}",
        "{{sunset}}",
        "{{hourly_rows}}",
        "{{daily_rows}}",
        "{{background}}",
    ] {
        page = page.replace(placeholder, "");
    }

    page
}

/// Four metric rows; one `<td>` per remaining hour of today.
fn hourly_rows(table: &HourlyTable) -> String {
    let mut rows = vec![String::from("<tr>"); HourlyTable::ROWS];

    let columns = table
        .times
        .iter()
        .zip(&table.icons)
        .zip(&table.temperatures)
        .zip(&table.precipitation);
    for (((time, icon), temperature), precipitation) in columns {
        let _ = write!(rows[0], "<td>{time}</td>");
        let _ = write!(
            rows[1],
            "<td><img src=\"./img/{icon}.png\" width=\"50px\" /></td>"
        );
        let _ = write!(rows[2], "<td>{temperature}</td>");
        let _ = write!(
            rows[3],
            "<td><img src=\"./img/water.png\" width=\"15px\" /> {precipitation}</td>"
        );
    }

    rows.into_iter().map(|row| row + "</tr>").collect()
}

fn daily_rows(rows: &[DailyRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "<tr>\
                 <td>{}</td>\
                 <td><img src=\"./img/water.png\" width=\"15px\" /> {}</td>\
                 <td><img src=\"./img/sunrise.png\" width=\"20px\" /> {}</td>\
                 <td><img src=\"./img/sunset.png\" width=\"20px\" /> {}</td>\
                 <td>{}</td>\
                 <td>{}</td>\
                 </tr>",
                row.weekday,
                row.precipitation_hours,
                row.sunrise,
                row.sunset,
                row.temp_max,
                row.temp_min
            )
        })
        .collect()
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
