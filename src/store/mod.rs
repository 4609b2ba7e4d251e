//! Persistence seams for diaries, the weather cache and memos.
//!
//! `PgStore` is the production adapter. Tests use the in-memory store, which
//! honours the same contracts (lowest-id update, upsert-by-date cache,
//! all-or-nothing diary transactions).

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::diary::Diary;
use crate::models::memo::Memo;
use crate::models::weather::WeatherSnapshot;

pub use postgres::PgStore;

#[async_trait]
pub trait DiaryStore: Send + Sync {
    /// Opens a unit of work running under SERIALIZABLE isolation. Dropping it
    /// without calling `commit` rolls everything back.
    async fn begin_serializable(&self) -> AppResult<Box<dyn DiaryTransaction>>;

    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Vec<Diary>>;

    /// Entries with `start <= date <= end`, ordered by date then id.
    async fn find_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Diary>>;

    /// Replaces the text of the lowest-id entry for `date`.
    async fn update_first_text(&self, date: NaiveDate, text: &str) -> AppResult<Option<Diary>>;

    async fn delete_by_date(&self, date: NaiveDate) -> AppResult<u64>;

    async fn ping(&self) -> bool;
}

#[async_trait]
pub trait DiaryTransaction: Send {
    async fn cached_weather(&mut self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>>;

    async fn insert_diary(
        &mut self,
        date: NaiveDate,
        text: &str,
        weather: Option<&WeatherSnapshot>,
    ) -> AppResult<Diary>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Date-keyed weather snapshots. One row per date.
#[async_trait]
pub trait WeatherCache: Send + Sync {
    /// Inserts or overwrites the snapshot stored for `snapshot.date`.
    async fn upsert(&self, snapshot: &WeatherSnapshot) -> AppResult<()>;

    async fn get(&self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>>;
}

#[async_trait]
pub trait MemoStore: Send + Sync {
    async fn save(&self, text: &str) -> AppResult<Memo>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Memo>>;

    async fn find_all(&self) -> AppResult<Vec<Memo>>;
}
