//! Diary use-cases.
//!
//! Creation resolves weather read-through: the cached snapshot for the diary
//! date wins; on a miss the configured [`WeatherMissPolicy`] decides between
//! today's live weather and no weather at all. The cache lookup, the optional
//! live fetch and the insert share one serializable transaction, so a failed
//! fetch or parse leaves nothing behind.
//!
//! Weather attached to a diary is a copy. Later cache refreshes never touch
//! existing diaries.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::WeatherMissPolicy;
use crate::error::{AppError, AppResult};
use crate::models::diary::Diary;
use crate::models::weather::WeatherSnapshot;
use crate::store::{DiaryStore, DiaryTransaction, WeatherCache};
use crate::weather::WeatherSource;

pub struct DiaryService {
    diaries: Arc<dyn DiaryStore>,
    cache: Arc<dyn WeatherCache>,
    weather: Arc<dyn WeatherSource>,
    miss_policy: WeatherMissPolicy,
}

impl DiaryService {
    pub fn new(
        diaries: Arc<dyn DiaryStore>,
        cache: Arc<dyn WeatherCache>,
        weather: Arc<dyn WeatherSource>,
        miss_policy: WeatherMissPolicy,
    ) -> Self {
        Self {
            diaries,
            cache,
            weather,
            miss_policy,
        }
    }

    /// Fetches today's weather and stores it in the cache, replacing any
    /// snapshot already stored for today.
    pub async fn refresh_weather_cache(&self) -> AppResult<WeatherSnapshot> {
        let snapshot = self.weather.current_weather().await?;
        self.cache.upsert(&snapshot).await?;

        tracing::info!(
            date = %snapshot.date,
            condition = %snapshot.condition,
            "Weather cache refreshed"
        );
        Ok(snapshot)
    }

    pub async fn cached_weather(&self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>> {
        self.cache.get(date).await
    }

    pub async fn create_diary(&self, date: NaiveDate, text: &str) -> AppResult<Diary> {
        let mut tx = self.diaries.begin_serializable().await?;
        let weather = self.resolve_weather(tx.as_mut(), date).await?;
        let diary = tx.insert_diary(date, text, weather.as_ref()).await?;
        tx.commit().await?;

        tracing::info!(diary_id = diary.id, date = %date, "Diary created");
        Ok(diary)
    }

    async fn resolve_weather(
        &self,
        tx: &mut dyn DiaryTransaction,
        date: NaiveDate,
    ) -> AppResult<Option<WeatherSnapshot>> {
        if let Some(cached) = tx.cached_weather(date).await? {
            return Ok(Some(cached));
        }

        match self.miss_policy {
            WeatherMissPolicy::Current => {
                tracing::debug!(date = %date, "No cached weather, using current conditions");
                Ok(Some(self.weather.current_weather().await?))
            }
            WeatherMissPolicy::Empty => Ok(None),
        }
    }

    pub async fn read_diary(&self, date: NaiveDate) -> AppResult<Vec<Diary>> {
        self.diaries.find_by_date(date).await
    }

    pub async fn read_diaries(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Diary>> {
        if start > end {
            return Err(AppError::Validation(
                "start_date must not be after end_date".into(),
            ));
        }
        self.diaries.find_between(start, end).await
    }

    /// Replaces the text of the earliest diary written for `date`.
    pub async fn update_diary(&self, date: NaiveDate, text: &str) -> AppResult<Diary> {
        let diary = self
            .diaries
            .update_first_text(date, text)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No diary for {date}")))?;

        tracing::info!(diary_id = diary.id, date = %date, "Diary updated");
        Ok(diary)
    }

    pub async fn delete_diary(&self, date: NaiveDate) -> AppResult<u64> {
        let deleted = self.diaries.delete_by_date(date).await?;
        tracing::info!(date = %date, deleted, "Diaries deleted");
        Ok(deleted)
    }

    pub async fn is_ready(&self) -> bool {
        self.diaries.ping().await
    }
}
