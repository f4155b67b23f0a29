//! Builds the single round-trip weather query.

use reqwest::{Method, Url};

use crate::{error::WeatherError, units::TemperatureUnit};

const FIELDS: &str =
    "link,location,wind,atmosphere,units,item.condition,item.forecast,astronomy";

/// A fully built request, ready to hand to a [`WeatherFetcher`](crate::WeatherFetcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
}

#[derive(Debug, Clone)]
pub struct WeatherQueryBuilder {
    endpoint: Url,
}

impl WeatherQueryBuilder {
    pub fn new(endpoint: &str) -> Result<Self, WeatherError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| WeatherError::InvalidEndpoint(format!("'{endpoint}': {e}")))?;
        Ok(Self { endpoint })
    }

    /// Query for current conditions, two-day forecast and astronomy of one
    /// location, in the unit system of `unit`.
    pub fn build_query(
        &self,
        location_id: &str,
        unit: TemperatureUnit,
    ) -> Result<RequestDescriptor, WeatherError> {
        let location_id = location_id.trim();
        if location_id.is_empty() {
            return Err(WeatherError::InvalidLocation);
        }

        let statement = format!(
            "select {FIELDS} from weather.forecast where location=\"{}\" and u=\"{}\"",
            location_id.replace('"', ""),
            unit.query_letter(),
        );

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", &statement);

        Ok(RequestDescriptor { method: Method::GET, url })
    }
}
