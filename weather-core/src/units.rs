//! Temperature and wind-speed units.
//!
//! The upstream API pairs its speed unit with the requested temperature unit:
//! asking for Celsius yields km/h, asking for Fahrenheit yields mph. All
//! conversions go through meters per second.

use serde::{Deserialize, Serialize};

pub const MPH_IN_MPS: f64 = 2.23693629;
pub const KPH_IN_MPS: f64 = 3.6;
pub const KNOTS_IN_MPS: f64 = 1.94384449;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Value of the `u` parameter in the weather query.
    pub fn query_letter(&self) -> char {
        match self {
            TemperatureUnit::Celsius => 'c',
            TemperatureUnit::Fahrenheit => 'f',
        }
    }

    pub fn symbol(&self) -> &'static str {
        unit_symbol(*self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kph,
    Mph,
    Mps,
    Knots,
}

impl WindSpeedUnit {
    pub fn label(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kph => "km/h",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Mps => "m/s",
            WindSpeedUnit::Knots => "knots",
        }
    }

    fn per_mps(&self) -> f64 {
        match self {
            WindSpeedUnit::Kph => KPH_IN_MPS,
            WindSpeedUnit::Mph => MPH_IN_MPS,
            WindSpeedUnit::Mps => 1.0,
            WindSpeedUnit::Knots => KNOTS_IN_MPS,
        }
    }
}

pub fn unit_symbol(unit: TemperatureUnit) -> &'static str {
    match unit {
        TemperatureUnit::Celsius => "\u{00b0}C",
        TemperatureUnit::Fahrenheit => "\u{00b0}F",
    }
}

/// Unit the API reports wind speed in for a given temperature unit.
pub fn source_wind_unit(unit: TemperatureUnit) -> WindSpeedUnit {
    match unit {
        TemperatureUnit::Celsius => WindSpeedUnit::Kph,
        TemperatureUnit::Fahrenheit => WindSpeedUnit::Mph,
    }
}

/// Converts `value` from `source` to `target`.
///
/// Matching units return the value untouched. Otherwise the result is
/// rounded to a whole unit, or to one decimal for m/s.
pub fn convert_wind_speed(value: f64, source: WindSpeedUnit, target: WindSpeedUnit) -> f64 {
    if source == target {
        return value;
    }

    let converted = value / source.per_mps() * target.per_mps();

    match target {
        WindSpeedUnit::Mps => (converted * 10.0).round() / 10.0,
        _ => converted.round(),
    }
}

/// Formats a speed without a trailing `.0` for whole values.
pub fn format_speed(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
