//! Turns a raw API document into a display-ready [`WeatherSnapshot`].
//!
//! Extraction is best effort: a missing field becomes a placeholder and
//! never aborts the snapshot. Only a document without a channel fails.

use serde_json::Value;
use tracing::debug;

use crate::{
    catalog::{
        NOT_AVAILABLE, PressureTendency, compass_direction, condition_label, parse_weekday,
        resolve_icon, weekday_name,
    },
    config::Configuration,
    error::WeatherError,
    model::{
        DaySlot, ForecastDay, Pressure, RawWeatherDocument, WeatherSnapshot, Wind, lookup,
        number_at, text_at,
    },
    units::{convert_wind_speed, format_speed, source_wind_unit},
};

/// Shown instead of a wind reading when the document has none.
pub const NO_WIND: &str = "\u{2013}";

const FORECAST_DAYS: usize = 2;

pub fn normalize<F>(
    doc: &RawWeatherDocument,
    config: &Configuration,
    icon_exists: F,
) -> Result<WeatherSnapshot, WeatherError>
where
    F: Fn(&str) -> bool,
{
    let channel = doc.channel().ok_or_else(|| {
        WeatherError::MalformedResponse("document has no query.results.channel".to_string())
    })?;

    let symbol = config.temperature_unit.symbol();
    let condition = lookup(channel, &["item", "condition"]).unwrap_or(&Value::Null);

    let location = match config.city_name_override() {
        Some(name) => name.to_string(),
        None => text_or_empty(channel, &["location", "city"]),
    };

    let code = condition_code(condition);
    let summary_text = summary(condition, code, config);
    let icon_id = resolve_icon(code, config.use_symbolic_icons, &icon_exists);

    let temperature = with_unit(text_at(condition, &["temp"]), symbol);
    let panel_text = if config.show_comment_in_panel {
        format!("{summary_text}, {temperature}")
    } else {
        temperature.clone()
    };

    let (sunrise, sunset) = if config.show_sunrise_sunset {
        (
            Some(text_or_empty(channel, &["astronomy", "sunrise"]).to_uppercase()),
            Some(text_or_empty(channel, &["astronomy", "sunset"]).to_uppercase()),
        )
    } else {
        (None, None)
    };

    let forecast_entries = lookup(channel, &["item", "forecast"])
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let forecast = (0..FORECAST_DAYS)
        .filter_map(DaySlot::from_index)
        .enumerate()
        .map(|(i, slot)| {
            let entry = forecast_entries.get(i).unwrap_or(&Value::Null);
            forecast_day(entry, slot, config, &icon_exists)
        })
        .collect();

    let snapshot = WeatherSnapshot {
        location,
        link: text_at(channel, &["link"]),
        icon_id,
        summary_text,
        panel_text,
        temperature,
        wind_chill: with_unit(text_at(channel, &["wind", "chill"]), symbol),
        humidity: with_unit(text_at(channel, &["atmosphere", "humidity"]), "%"),
        pressure: pressure(channel),
        wind: wind(channel, config),
        sunrise,
        sunset,
        forecast,
    };

    debug!(location = %snapshot.location, icon = %snapshot.icon_id, "weather normalized");
    Ok(snapshot)
}

fn text_or_empty(value: &Value, path: &[&str]) -> String {
    text_at(value, path).unwrap_or_default()
}

/// `"<value> <unit>"`, or an empty string when the value is missing.
fn with_unit(value: Option<String>, unit: &str) -> String {
    value.map(|v| format!("{v} {unit}")).unwrap_or_default()
}

fn condition_code(block: &Value) -> i32 {
    number_at(block, &["code"])
        .filter(|c| c.fract() == 0.0 && *c >= f64::from(i32::MIN) && *c <= f64::from(i32::MAX))
        .map(|c| c as i32)
        .unwrap_or(NOT_AVAILABLE)
}

fn summary(block: &Value, code: i32, config: &Configuration) -> String {
    if config.translate_condition {
        condition_label(code).to_string()
    } else {
        text_or_empty(block, &["text"])
    }
}

fn pressure(channel: &Value) -> Pressure {
    Pressure {
        value: text_or_empty(channel, &["atmosphere", "pressure"]),
        unit: text_or_empty(channel, &["units", "pressure"]),
        trend: text_at(channel, &["atmosphere", "rising"]).map(|raw| PressureTendency::parse(&raw)),
    }
}

fn wind(channel: &Value, config: &Configuration) -> Wind {
    let Some(speed) = number_at(channel, &["wind", "speed"]) else {
        return Wind {
            speed_text: NO_WIND.to_string(),
            direction_label: None,
        };
    };

    let source = source_wind_unit(config.temperature_unit);
    let target = config.wind_speed_unit;

    // `shown` is the number that ends up on screen; a light breeze that
    // rounds to zero gets no direction.
    let (shown, speed_text, unit) = if source == target {
        let raw = text_or_empty(channel, &["wind", "speed"]);
        let unit = text_at(channel, &["units", "speed"]).unwrap_or_else(|| source.label().to_string());
        (speed, raw, unit)
    } else {
        let converted = convert_wind_speed(speed, source, target);
        (converted, format_speed(converted), target.label().to_string())
    };

    let direction_label = number_at(channel, &["wind", "direction"])
        .map(|deg| compass_direction(deg).to_string());

    let speed_text = match &direction_label {
        Some(dir) if shown > 0.0 => format!("{dir} {speed_text} {unit}"),
        _ => format!("{speed_text} {unit}"),
    };

    Wind {
        speed_text,
        direction_label,
    }
}

fn forecast_day<F>(entry: &Value, slot: DaySlot, config: &Configuration, icon_exists: F) -> ForecastDay
where
    F: Fn(&str) -> bool,
{
    let code = condition_code(entry);
    let weekday = parse_weekday(&text_or_empty(entry, &["day"]));

    let low = text_or_empty(entry, &["low"]);
    let high = text_or_empty(entry, &["high"]);

    ForecastDay {
        slot,
        weekday,
        day_label: format!("{} ({})", slot.label(), weekday_name(weekday)),
        temperature_range_text: format!(
            "{low} \u{2013} {high} {}",
            config.temperature_unit.symbol()
        ),
        summary_text: summary(entry, code, config),
        icon_id: resolve_icon(code, config.use_symbolic_icons, icon_exists),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{TemperatureUnit, WindSpeedUnit};
    use chrono::Weekday;
    use serde_json::json;

    fn any_icon(_: &str) -> bool {
        true
    }

    fn paris_document() -> RawWeatherDocument {
        RawWeatherDocument::new(json!({
            "query": { "results": { "channel": {
                "link": "http://weather.example/615702",
                "location": { "city": "Paris", "country": "France" },
                "units": { "temperature": "C", "pressure": "mb", "speed": "km/h" },
                "wind": { "chill": "8", "direction": "45", "speed": "10" },
                "atmosphere": { "humidity": "81", "pressure": "1015.92", "rising": "1" },
                "astronomy": { "sunrise": "7:51 am", "sunset": "6:12 pm" },
                "item": {
                    "condition": { "code": "28", "temp": "11", "text": "Mostly Cloudy" },
                    "forecast": [
                        { "day": "Tue", "low": "6", "high": "13", "code": "30", "text": "Partly Cloudy" },
                        { "day": "Wed", "low": "4", "high": "12", "code": "11", "text": "Showers" }
                    ]
                }
            } } }
        }))
    }

    fn paris_config() -> Configuration {
        Configuration {
            location_id: "Paris".into(),
            temperature_unit: TemperatureUnit::Celsius,
            wind_speed_unit: WindSpeedUnit::Kph,
            ..Default::default()
        }
    }

    #[test]
    fn celsius_kph_keeps_reported_wind_speed() {
        let snapshot = normalize(&paris_document(), &paris_config(), any_icon).expect("snapshot");

        assert!(snapshot.wind.speed_text.ends_with("10 km/h"), "{}", snapshot.wind.speed_text);
        assert_eq!(snapshot.wind.speed_text, "NE 10 km/h");
        assert_eq!(snapshot.wind.direction_label.as_deref(), Some("NE"));
    }

    #[test]
    fn fahrenheit_readings_convert_to_kph() {
        let config = Configuration {
            temperature_unit: TemperatureUnit::Fahrenheit,
            ..paris_config()
        };

        let snapshot = normalize(&paris_document(), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.wind.speed_text, "NE 16 km/h");
        assert_eq!(snapshot.temperature, "11 °F");
    }

    #[test]
    fn mps_uses_one_decimal() {
        let config = Configuration {
            wind_speed_unit: WindSpeedUnit::Mps,
            ..paris_config()
        };

        let snapshot = normalize(&paris_document(), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.wind.speed_text, "NE 2.8 m/s");
    }

    #[test]
    fn missing_wind_degrades_to_dash() {
        let mut doc = paris_document().root().clone();
        doc["query"]["results"]["channel"]
            .as_object_mut()
            .expect("channel object")
            .remove("wind");

        let snapshot =
            normalize(&RawWeatherDocument::new(doc), &paris_config(), any_icon).expect("snapshot");

        assert_eq!(snapshot.wind.speed_text, "\u{2013}");
        assert_eq!(snapshot.wind.direction_label, None);
        assert_eq!(snapshot.wind_chill, "");
        assert_eq!(snapshot.location, "Paris");
        assert_eq!(snapshot.humidity, "81 %");
        assert_eq!(snapshot.forecast.len(), 2);
    }

    #[test]
    fn calm_wind_has_no_direction_prefix() {
        let mut doc = paris_document().root().clone();
        doc["query"]["results"]["channel"]["wind"]["speed"] = json!("0");

        let snapshot =
            normalize(&RawWeatherDocument::new(doc), &paris_config(), any_icon).expect("snapshot");
        assert_eq!(snapshot.wind.speed_text, "0 km/h");
    }

    #[test]
    fn light_wind_rounding_to_zero_has_no_direction_prefix() {
        let mut doc = paris_document().root().clone();
        doc["query"]["results"]["channel"]["wind"] = json!({ "speed": "0.1", "direction": "45" });

        let config = Configuration {
            wind_speed_unit: WindSpeedUnit::Mph,
            ..paris_config()
        };

        let snapshot = normalize(&RawWeatherDocument::new(doc), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.wind.speed_text, "0 mph");
        assert_eq!(snapshot.wind.direction_label.as_deref(), Some("NE"));
    }

    #[test]
    fn current_conditions_are_populated() {
        let snapshot = normalize(&paris_document(), &paris_config(), any_icon).expect("snapshot");

        assert_eq!(snapshot.location, "Paris");
        assert_eq!(snapshot.link.as_deref(), Some("http://weather.example/615702"));
        assert_eq!(snapshot.summary_text, "Mostly cloudy");
        assert_eq!(snapshot.icon_id, "weather-clouds");
        assert_eq!(snapshot.temperature, "11 °C");
        assert_eq!(snapshot.panel_text, "11 °C");
        assert_eq!(snapshot.wind_chill, "8 °C");
        assert_eq!(snapshot.pressure.to_string(), "1015.92 mb \u{2934}");
        assert_eq!(snapshot.sunrise, None);
        assert_eq!(snapshot.sunset, None);
    }

    #[test]
    fn raw_text_when_translation_is_off() {
        let config = Configuration {
            translate_condition: false,
            show_comment_in_panel: true,
            ..paris_config()
        };

        let snapshot = normalize(&paris_document(), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.summary_text, "Mostly Cloudy");
        assert_eq!(snapshot.panel_text, "Mostly Cloudy, 11 °C");
        assert_eq!(snapshot.forecast[1].summary_text, "Showers");
    }

    #[test]
    fn city_override_wins() {
        let config = Configuration {
            city_name_override: "Home".into(),
            ..paris_config()
        };

        let snapshot = normalize(&paris_document(), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.location, "Home");
    }

    #[test]
    fn sunrise_and_sunset_when_enabled() {
        let config = Configuration {
            show_sunrise_sunset: true,
            ..paris_config()
        };

        let snapshot = normalize(&paris_document(), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.sunrise.as_deref(), Some("7:51 AM"));
        assert_eq!(snapshot.sunset.as_deref(), Some("6:12 PM"));
    }

    #[test]
    fn icons_fall_back_through_theme() {
        let only_overcast = |name: &str| name == "weather-overcast";
        let snapshot = normalize(&paris_document(), &paris_config(), only_overcast).expect("snapshot");

        assert_eq!(snapshot.icon_id, "weather-overcast");
        assert_eq!(snapshot.forecast[0].icon_id, "weather-severe-alert");
    }

    #[test]
    fn symbolic_icons_are_requested() {
        let config = Configuration {
            use_symbolic_icons: true,
            ..paris_config()
        };

        let snapshot = normalize(&paris_document(), &config, any_icon).expect("snapshot");
        assert_eq!(snapshot.icon_id, "weather-clouds-symbolic");
    }

    #[test]
    fn forecast_days_are_labelled() {
        let snapshot = normalize(&paris_document(), &paris_config(), any_icon).expect("snapshot");
        let [today, tomorrow] = snapshot.forecast.as_slice() else {
            panic!("expected two forecast days");
        };

        assert_eq!(today.slot, DaySlot::Today);
        assert_eq!(today.weekday, Weekday::Tue);
        assert_eq!(today.day_label, "Today (Tuesday)");
        assert_eq!(today.temperature_range_text, "6 \u{2013} 13 °C");
        assert_eq!(today.summary_text, "Partly cloudy");
        assert_eq!(today.icon_id, "weather-few-clouds");

        assert_eq!(tomorrow.slot, DaySlot::Tomorrow);
        assert_eq!(tomorrow.day_label, "Tomorrow (Wednesday)");
        assert_eq!(tomorrow.icon_id, "weather-showers");
    }

    #[test]
    fn missing_forecast_degrades_to_placeholders() {
        let mut doc = paris_document().root().clone();
        doc["query"]["results"]["channel"]["item"]["forecast"] = json!([]);

        let snapshot =
            normalize(&RawWeatherDocument::new(doc), &paris_config(), any_icon).expect("snapshot");

        assert_eq!(snapshot.forecast.len(), 2);
        assert_eq!(snapshot.forecast[0].weekday, Weekday::Mon);
        assert_eq!(snapshot.forecast[0].summary_text, "Not available");
        assert_eq!(snapshot.forecast[0].icon_id, "weather-severe-alert");
    }

    #[test]
    fn empty_tendency_keeps_steady_glyph_without_separator() {
        let mut doc = paris_document().root().clone();
        doc["query"]["results"]["channel"]["atmosphere"]["rising"] = json!("");

        let snapshot =
            normalize(&RawWeatherDocument::new(doc), &paris_config(), any_icon).expect("snapshot");
        assert_eq!(snapshot.pressure.trend, None);
        assert_eq!(snapshot.pressure.to_string(), "1015.92 mb\u{2933}");
    }

    #[test]
    fn missing_tendency_field_keeps_steady_glyph() {
        let doc = RawWeatherDocument::new(json!({
            "query": { "results": { "channel": {
                "units": { "pressure": "mb" },
                "atmosphere": { "pressure": "1015" }
            } } }
        }));

        let snapshot = normalize(&doc, &paris_config(), any_icon).expect("snapshot");
        assert_eq!(snapshot.pressure.to_string(), "1015 mb\u{2933}");
    }

    #[test]
    fn missing_channel_is_malformed() {
        let doc = RawWeatherDocument::new(json!({ "query": { "count": 0, "results": null } }));

        let err = normalize(&doc, &paris_config(), any_icon).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn empty_channel_still_yields_snapshot() {
        let doc = RawWeatherDocument::new(json!({ "query": { "results": { "channel": {} } } }));

        let snapshot = normalize(&doc, &paris_config(), any_icon).expect("snapshot");
        assert_eq!(snapshot.location, "");
        assert_eq!(snapshot.summary_text, "Not available");
        assert_eq!(snapshot.icon_id, "weather-severe-alert");
        assert_eq!(snapshot.wind.speed_text, "\u{2013}");
    }
}
