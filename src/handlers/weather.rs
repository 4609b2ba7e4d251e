use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::models::weather::WeatherSnapshot;
use crate::AppState;

pub async fn get_cached_weather(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<WeatherSnapshot>> {
    let snapshot = state
        .diaries
        .cached_weather(date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No cached weather for {date}")))?;

    Ok(Json(snapshot))
}

/// Manual trigger for the daily cache refresh.
pub async fn refresh_weather(State(state): State<AppState>) -> AppResult<Json<WeatherSnapshot>> {
    let snapshot = state.diaries.refresh_weather_cache().await?;
    Ok(Json(snapshot))
}
