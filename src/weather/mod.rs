//! Current-weather lookup against OpenWeatherMap.
//!
//! [`WeatherClient`] performs the HTTP call and returns the raw body,
//! [`parser::parse_weather`] turns that body into a [`WeatherSnapshot`].
//! The [`WeatherSource`] trait joins the two so the diary service can be
//! driven by a fake source in tests.

pub mod client;
pub mod parser;

use async_trait::async_trait;

use crate::models::weather::WeatherSnapshot;

pub use client::WeatherClient;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed weather payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather payload has no conditions")]
    NoConditions,
}

/// Something that can report today's weather.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetches the current weather, stamped with today's local date.
    async fn current_weather(&self) -> Result<WeatherSnapshot, WeatherError>;
}
