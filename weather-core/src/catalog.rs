//! Condition-code tables and the small display lookups built around them.
//!
//! Codes follow the provider's condition table: 0..=47 plus 3200 for
//! "not available". Anything else gets the severe-alert representation.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Sentinel code the provider sends when no condition is available.
pub const NOT_AVAILABLE: i32 = 3200;

/// Icon used when no candidate exists in the icon theme.
pub const FALLBACK_ICON: &str = "weather-severe-alert";

const SYMBOLIC_SUFFIX: &str = "-symbolic";

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn base_icons(code: i32) -> &'static [&'static str] {
    match code {
        // tornado, tropical storm, hurricane, severe thunderstorms
        0..=3 => &["weather-severe-alert"],
        4 | 37 | 38 | 45 | 47 => &["weather-storm"],
        // mixed rain and snow / sleet
        5 | 6 => &["weather-snow-rain", "weather-snow"],
        7 | 13..=18 | 41..=43 | 46 => &["weather-snow"],
        // freezing drizzle, freezing rain
        8 | 10 => &["weather-freezing-rain", "weather-showers"],
        9 | 19..=22 => &["weather-fog"],
        11 | 12 => &["weather-showers"],
        // blustery, windy, cold
        23..=25 => &["weather-few-clouds"],
        26 => &["weather-overcast"],
        27 => &["weather-clouds-night", "weather-few-clouds-night"],
        28 => &["weather-clouds", "weather-overcast"],
        29 => &["weather-few-clouds-night"],
        30 | 44 => &["weather-few-clouds"],
        31 | 33 => &["weather-clear-night"],
        32 | 34 | 36 => &["weather-clear"],
        35 => &["weather-snow-rain", "weather-showers"],
        // the provider reports scattered showers as 39 as well as 40
        39 | 40 => &["weather-showers-scattered", "weather-showers"],
        _ => &[FALLBACK_ICON],
    }
}

/// Icon names for `code`, most specific first.
pub fn icon_candidates(code: i32, symbolic: bool) -> Vec<String> {
    let suffix = if symbolic { SYMBOLIC_SUFFIX } else { "" };

    base_icons(code)
        .iter()
        .map(|name| format!("{name}{suffix}"))
        .collect()
}

/// Untranslated label for `code`, suitable as a gettext msgid.
pub fn condition_label(code: i32) -> &'static str {
    match code {
        0 => "Tornado",
        1 => "Tropical storm",
        2 => "Hurricane",
        3 => "Severe thunderstorms",
        4 => "Thunderstorms",
        5 => "Mixed rain and snow",
        6 => "Mixed rain and sleet",
        7 => "Mixed snow and sleet",
        8 => "Freezing drizzle",
        9 => "Drizzle",
        10 => "Freezing rain",
        11 | 12 => "Showers",
        13 => "Snow flurries",
        14 => "Light snow showers",
        15 => "Blowing snow",
        16 => "Snow",
        17 => "Hail",
        18 => "Sleet",
        19 => "Dust",
        20 => "Foggy",
        21 => "Haze",
        22 => "Smoky",
        23 => "Blustery",
        24 => "Windy",
        25 => "Cold",
        26 => "Cloudy",
        27 | 28 => "Mostly cloudy",
        29 | 30 | 44 => "Partly cloudy",
        31 => "Clear",
        32 => "Sunny",
        33 | 34 => "Fair",
        35 => "Mixed rain and hail",
        36 => "Hot",
        37 => "Isolated thunderstorms",
        38 | 39 => "Scattered thunderstorms",
        40 => "Scattered showers",
        41 | 43 => "Heavy snow",
        42 => "Scattered snow showers",
        45 => "Thundershowers",
        46 => "Snow showers",
        47 => "Isolated thundershowers",
        _ => "Not available",
    }
}

/// Picks the first candidate for which `icon_exists` holds.
///
/// Falls back to the plain [`FALLBACK_ICON`], without symbolic suffix, when
/// the theme has none of them.
pub fn resolve_icon<F>(code: i32, symbolic: bool, icon_exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    icon_candidates(code, symbolic)
        .into_iter()
        .find(|name| icon_exists(name))
        .unwrap_or_else(|| FALLBACK_ICON.to_string())
}

/// Eight-point compass label for a bearing in degrees.
pub fn compass_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round().rem_euclid(COMPASS.len() as f64) as usize;
    COMPASS[index % COMPASS.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PressureTendency {
    #[default]
    Steady,
    Rising,
    Falling,
}

impl PressureTendency {
    /// Parses the provider's numeric indicator (`0`, `1`, `2`).
    ///
    /// Anything unrecognised is treated as steady.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(1) => PressureTendency::Rising,
            Ok(2) => PressureTendency::Falling,
            _ => PressureTendency::Steady,
        }
    }

    pub fn glyph(&self) -> char {
        pressure_trend_glyph(*self)
    }
}

pub fn pressure_trend_glyph(tendency: PressureTendency) -> char {
    match tendency {
        PressureTendency::Steady => '\u{2933}',
        PressureTendency::Rising => '\u{2934}',
        PressureTendency::Falling => '\u{2935}',
    }
}

/// Maps a day abbreviation such as `"Tue"` to a weekday.
///
/// Case-insensitive prefix match, first hit wins; no match yields Monday.
pub fn parse_weekday(abbr: &str) -> Weekday {
    let abbr = abbr.trim().to_lowercase();

    WEEKDAYS
        .into_iter()
        .find(|day| weekday_name(*day).to_lowercase().starts_with(&abbr))
        .unwrap_or(Weekday::Mon)
}

/// Full English name, used as a gettext msgid by the display side.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
