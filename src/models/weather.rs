use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Weather reading for exactly one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WeatherSnapshot {
    pub date: NaiveDate,
    pub condition: String,
    pub icon: String,
    pub temperature: f64,
}
