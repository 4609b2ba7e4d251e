use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::NaiveTime;

/// What `create_diary` does when no cached snapshot exists for the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherMissPolicy {
    /// Fetch today's weather live and attach it, whatever the diary date.
    #[default]
    Current,
    /// Save the diary without weather.
    Empty,
}

impl FromStr for WeatherMissPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "none" | "empty" => Ok(Self::Empty),
            other => Err(anyhow!("unknown weather miss policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    pub weather_api_key: String,
    pub weather_api_base: String,
    pub weather_city: String,
    pub weather_timeout: Duration,
    pub weather_refresh_at: NaiveTime,
    pub weather_miss_policy: WeatherMissPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `env::var`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "8080")
                .parse()
                .context("PORT must be a number")?,
            cors_origins: var("CORS_ORIGINS", "")
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),

            weather_api_key: lookup("OPENWEATHERMAP_KEY")
                .filter(|k| !k.is_empty())
                .context("OPENWEATHERMAP_KEY must be set")?,
            weather_api_base: var("WEATHER_API_BASE", "https://api.openweathermap.org"),
            weather_city: var("WEATHER_CITY", "seoul"),
            weather_timeout: Duration::from_secs(
                var("WEATHER_TIMEOUT_SECS", "10")
                    .parse()
                    .context("WEATHER_TIMEOUT_SECS must be a number")?,
            ),
            weather_refresh_at: NaiveTime::parse_from_str(&var("WEATHER_REFRESH_AT", "01:00"), "%H:%M")
                .context("WEATHER_REFRESH_AT must be HH:MM")?,
            weather_miss_policy: var("WEATHER_MISS_POLICY", "current").parse()?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
