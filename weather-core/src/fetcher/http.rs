use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::HttpConfig,
    error::WeatherError,
    model::RawWeatherDocument,
    query::RequestDescriptor,
};

use super::WeatherFetcher;

/// [`WeatherFetcher`] over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpWeatherFetcher {
    http: Client,
}

impl HttpWeatherFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl WeatherFetcher for HttpWeatherFetcher {
    #[instrument(skip_all, fields(host = request.url.host_str().unwrap_or_default()))]
    async fn fetch(&self, request: &RequestDescriptor) -> Result<RawWeatherDocument, WeatherError> {
        debug!(url = %request.url, "requesting weather");

        let res = self
            .http
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(|e| WeatherError::Network(format!("Failed to send weather request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Network(format!("Failed to read weather response body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::Network(format!(
                "Weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let root: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Parse(format!(
                "Failed to parse weather JSON ({e}): {}",
                truncate_body(&body)
            ))
        })?;

        debug!(status = %status, bytes = body.len(), "weather response parsed");
        Ok(RawWeatherDocument::new(root))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
