use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;

use crate::models::weather::WeatherSnapshot;
use crate::weather::parser::parse_weather;
use crate::weather::{WeatherError, WeatherSource};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// OpenWeatherMap client for one fixed city.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    city: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        city: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            city: city.into(),
            api_key: api_key.into(),
        })
    }

    /// GETs the current weather and returns the response body untouched.
    ///
    /// Errors never carry the request URL, which embeds the API key.
    pub async fn fetch_current_weather(&self) -> Result<String, WeatherError> {
        tracing::debug!(city = %self.city, "Fetching current weather");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, CURRENT_WEATHER_PATH))
            .query(&[("q", self.city.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await.map_err(reqwest::Error::without_url)?)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current_weather(&self) -> Result<WeatherSnapshot, WeatherError> {
        let raw = self.fetch_current_weather().await?;
        parse_weather(&raw, Local::now().date_naive())
    }
}
