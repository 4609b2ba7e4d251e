use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::weather::WeatherSnapshot;
use crate::weather::WeatherError;

#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    main: MainReadings,
    weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
    icon: String,
}

/// Extracts temperature, condition and icon from a current-weather body.
///
/// Only the first entry of the `weather` array is used. Unknown fields are
/// ignored; a missing field or an empty array is an error.
pub fn parse_weather(raw: &str, date: NaiveDate) -> Result<WeatherSnapshot, WeatherError> {
    let payload: CurrentWeatherPayload = serde_json::from_str(raw)?;
    let first = payload
        .weather
        .into_iter()
        .next()
        .ok_or(WeatherError::NoConditions)?;

    Ok(WeatherSnapshot {
        date,
        condition: first.main,
        icon: first.icon,
        temperature: payload.main.temp,
    })
}
