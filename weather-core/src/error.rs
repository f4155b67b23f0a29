use thiserror::Error;

/// Failures of a single refresh cycle.
///
/// None of these are fatal: the scheduler logs them and waits for the next
/// interval, and the previously published snapshot stays on display.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The configured location id is empty.
    #[error("No location configured.\nHint: set `location-id` in the configuration file.")]
    InvalidLocation,

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint {0}")]
    InvalidEndpoint(String),

    /// Connection failure, timeout or a non-2xx status.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document has no `query.results.channel` to extract from.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Short, stable name of the variant for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::InvalidLocation => "invalid_location",
            WeatherError::InvalidEndpoint(_) => "invalid_endpoint",
            WeatherError::Network(_) => "network",
            WeatherError::Parse(_) => "parse",
            WeatherError::MalformedResponse(_) => "malformed_response",
        }
    }
}
