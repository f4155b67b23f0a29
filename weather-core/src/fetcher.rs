use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::RawWeatherDocument, query::RequestDescriptor};

pub mod http;

pub use http::HttpWeatherFetcher;

/// Performs one weather request and returns the parsed document.
///
/// Built once per process and shared, so implementations can reuse
/// connections across refresh cycles.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<RawWeatherDocument, WeatherError>;
}
