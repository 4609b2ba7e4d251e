use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[cfg(test)]
use crate::models::weather::WeatherSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Diary {
    pub id: i64,
    pub date: NaiveDate,
    pub text: String,
    // Copied from the snapshot at creation time and never refreshed.
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub temperature: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl Diary {
    /// Returns true when the attached weather equals `snapshot`.
    pub fn has_weather(&self, snapshot: &WeatherSnapshot) -> bool {
        self.condition.as_deref() == Some(snapshot.condition.as_str())
            && self.icon.as_deref() == Some(snapshot.icon.as_str())
            && self.temperature == Some(snapshot.temperature)
    }

    pub fn has_no_weather(&self) -> bool {
        self.condition.is_none() && self.icon.is_none() && self.temperature.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct WriteDiaryRequest {
    pub date: NaiveDate,

    #[validate(length(max = 10000, message = "Diary text must be at most 10000 characters"))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DiaryDateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DiaryRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct DeleteDiaryResponse {
    pub deleted: u64,
    pub date: NaiveDate,
}
