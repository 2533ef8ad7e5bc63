use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    Config,
    envelope::{self, Envelope},
    error::WeatherError,
    model::{CurrentWeather, ForecastEntry, HistoryEntry, SavedCitySummary},
};

/// Read-only calls against the weather backend.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError>;

    /// Stored observations for the last `days` days. Empty when the backend
    /// has none.
    async fn history(&self, city: &str, days: u32) -> Result<Vec<HistoryEntry>, WeatherError>;

    async fn saved_cities(&self) -> Result<Vec<SavedCitySummary>, WeatherError>;
}

/// [`WeatherBackend`] over HTTP, speaking the `{success, message, data, count}` envelope.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            http: Client::new(),
        }
    }

    /// `{base}/weather/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, WeatherError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| WeatherError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("weather")
            .extend(segments);
        Ok(url)
    }

    async fn get<T>(&self, url: Url) -> Result<Envelope<T>, WeatherError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!(%url, "GET");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "response");

        // Error statuses still carry an envelope, so the body decides.
        envelope::decode(status.as_u16(), &body)
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let url = self.endpoint(&["current", city])?;
        self.get(url).await?.into_result()
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let url = self.endpoint(&["forecast", city])?;
        self.get(url).await?.into_result()
    }

    async fn history(&self, city: &str, days: u32) -> Result<Vec<HistoryEntry>, WeatherError> {
        let mut url = self.endpoint(&["history", city])?;
        url.query_pairs_mut().append_pair("days", &days.to_string());

        let envelope: Envelope<Vec<HistoryEntry>> = self.get(url).await?;
        if envelope.success && envelope.is_counted_empty() {
            return Ok(Vec::new());
        }
        envelope.into_result()
    }

    async fn saved_cities(&self) -> Result<Vec<SavedCitySummary>, WeatherError> {
        let url = self.endpoint(&["cities"])?;
        self.get(url).await?.into_result()
    }
}

/// Construct the HTTP backend described by `config`.
pub fn backend_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherBackend>> {
    let base = config.api_base_url()?;
    Ok(Box::new(HttpBackend::new(base)))
}
