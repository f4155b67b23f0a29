use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::catalog::PressureTendency;

/// The API response as parsed JSON, accessed by field path.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeatherDocument(Value);

impl RawWeatherDocument {
    pub fn new(root: Value) -> Self {
        Self(root)
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    /// The `query.results.channel` object every field hangs off.
    pub fn channel(&self) -> Option<&Value> {
        lookup(&self.0, &["query", "results", "channel"]).filter(|v| v.is_object())
    }
}

impl From<Value> for RawWeatherDocument {
    fn from(root: Value) -> Self {
        Self(root)
    }
}

/// Follows `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

/// Scalar at `path` as text. The API sends numbers as strings, but plain
/// JSON numbers are accepted too. Empty strings count as absent.
pub fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    let text = match lookup(value, path)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Scalar at `path` as a number.
pub fn number_at(value: &Value, path: &[&str]) -> Option<f64> {
    let number = match lookup(value, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pressure {
    pub value: String,
    pub unit: String,
    /// `None` when the document carries no tendency indicator.
    pub trend: Option<PressureTendency>,
}

/// `"1015 mb ⤴"`; without an indicator the steady glyph follows the unit
/// with no separator: `"1015 mb⤳"`.
impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)?;
        let separator = if self.trend.is_some() { " " } else { "" };
        write!(f, "{separator}{}", self.trend.unwrap_or_default().glyph())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Full display line, e.g. `"NE 16 km/h"`, or `"–"` without data.
    pub speed_text: String,
    pub direction_label: Option<String>,
}

/// Which calendar slot a forecast entry fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySlot {
    Today,
    Tomorrow,
}

impl DaySlot {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DaySlot::Today),
            1 => Some(DaySlot::Tomorrow),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DaySlot::Today => "Today",
            DaySlot::Tomorrow => "Tomorrow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub slot: DaySlot,
    pub weekday: Weekday,
    /// `"Today (Monday)"`.
    pub day_label: String,
    /// `"3 – 11 °C"`.
    pub temperature_range_text: String,
    pub summary_text: String,
    pub icon_id: String,
}

/// One complete, display-ready refresh result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    /// Details page for the location, if the API sent one.
    pub link: Option<String>,
    pub icon_id: String,
    pub summary_text: String,
    pub panel_text: String,
    pub temperature: String,
    pub wind_chill: String,
    pub humidity: String,
    pub pressure: Pressure,
    pub wind: Wind,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub forecast: Vec<ForecastDay>,
}
