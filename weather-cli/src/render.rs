//! Plain-text stand-ins for the panel button and its popup menu.

use std::fmt::{self, Write};

use weather_core::{Configuration, WeatherSnapshot};

/// What the panel button shows: the icon name, then the text if enabled.
pub fn panel_line(snapshot: &WeatherSnapshot, config: &Configuration) -> String {
    if config.show_text_in_panel {
        format!("[{}] {}", snapshot.icon_id, snapshot.panel_text)
    } else {
        format!("[{}]", snapshot.icon_id)
    }
}

pub fn popup(snapshot: &WeatherSnapshot) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "{}...", snapshot.location)?;
    if let Some(link) = &snapshot.link {
        writeln!(out, "  {link}")?;
    }
    writeln!(out, "  {}, {}", snapshot.summary_text, snapshot.temperature)?;
    if let (Some(sunrise), Some(sunset)) = (&snapshot.sunrise, &snapshot.sunset) {
        writeln!(out, "  Sunrise: {sunrise}   Sunset: {sunset}")?;
    }

    let rows = [
        ("Wind chill:", snapshot.wind_chill.clone()),
        ("Humidity:", snapshot.humidity.clone()),
        ("Pressure:", snapshot.pressure.to_string()),
        ("Wind:", snapshot.wind.speed_text.clone()),
    ];
    for (caption, value) in rows {
        writeln!(out, "  {caption:<12}{value}")?;
    }

    out.push_str("  ----\n");
    for day in &snapshot.forecast {
        writeln!(
            out,
            "  [{}] {}: {}, {}",
            day.icon_id, day.day_label, day.summary_text, day.temperature_range_text
        )?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use weather_core::{DaySlot, ForecastDay, Pressure, Wind};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Paris".into(),
            link: None,
            icon_id: "weather-clear".into(),
            summary_text: "Sunny".into(),
            panel_text: "20 °C".into(),
            temperature: "20 °C".into(),
            wind_chill: "20 °C".into(),
            humidity: "40 %".into(),
            pressure: Pressure {
                value: "1020".into(),
                unit: "mb".into(),
                trend: None,
            },
            wind: Wind {
                speed_text: "N 5 km/h".into(),
                direction_label: Some("N".into()),
            },
            sunrise: Some("7:51 AM".into()),
            sunset: Some("6:12 PM".into()),
            forecast: vec![ForecastDay {
                slot: DaySlot::Today,
                weekday: Weekday::Mon,
                day_label: "Today (Monday)".into(),
                temperature_range_text: "10 – 22 °C".into(),
                summary_text: "Fair".into(),
                icon_id: "weather-clear".into(),
            }],
        }
    }

    #[test]
    fn panel_line_respects_text_setting() {
        let mut config = Configuration::default();
        assert_eq!(panel_line(&snapshot(), &config), "[weather-clear] 20 °C");

        config.show_text_in_panel = false;
        assert_eq!(panel_line(&snapshot(), &config), "[weather-clear]");
    }

    #[test]
    fn popup_lists_current_and_forecast() {
        let text = popup(&snapshot()).expect("popup");

        assert!(text.starts_with("Paris..."));
        assert!(text.contains("Sunny, 20 °C"));
        assert!(text.contains("Sunrise: 7:51 AM"));
        assert!(text.contains("Pressure:   1020 mb\u{2933}"));
        assert!(text.contains("Wind:       N 5 km/h"));
        assert!(text.contains("[weather-clear] Today (Monday): Fair, 10 – 22 °C"));
    }
}
