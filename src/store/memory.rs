use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::AppResult;
use crate::models::diary::Diary;
use crate::models::memo::Memo;
use crate::models::weather::WeatherSnapshot;
use crate::store::{DiaryStore, DiaryTransaction, MemoStore, WeatherCache};

#[derive(Debug, Default)]
struct MemoryState {
    diaries: Vec<Diary>,
    weather: BTreeMap<NaiveDate, WeatherSnapshot>,
    memos: Vec<Memo>,
    next_diary_id: i64,
}

/// Store backed by a single mutex. A diary transaction holds the lock until
/// it commits or drops, so transactions are trivially serializable.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `ping` report the store as unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn diary_count(&self) -> usize {
        self.state.lock().await.diaries.len()
    }

    pub async fn weather_rows(&self) -> usize {
        self.state.lock().await.weather.len()
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    pending: Vec<Diary>,
}

#[async_trait]
impl DiaryStore for MemoryStore {
    async fn begin_serializable(&self) -> AppResult<Box<dyn DiaryTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTransaction {
            guard,
            pending: Vec::new(),
        }))
    }

    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Vec<Diary>> {
        let state = self.state.lock().await;
        Ok(state
            .diaries
            .iter()
            .filter(|d| d.date == date)
            .cloned()
            .collect())
    }

    async fn find_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Diary>> {
        let state = self.state.lock().await;
        let mut diaries: Vec<Diary> = state
            .diaries
            .iter()
            .filter(|d| start <= d.date && d.date <= end)
            .cloned()
            .collect();
        diaries.sort_by_key(|d| (d.date, d.id));
        Ok(diaries)
    }

    async fn update_first_text(&self, date: NaiveDate, text: &str) -> AppResult<Option<Diary>> {
        let mut state = self.state.lock().await;
        let first = state
            .diaries
            .iter_mut()
            .filter(|d| d.date == date)
            .min_by_key(|d| d.id);

        Ok(first.map(|diary| {
            diary.text = text.to_string();
            diary.updated_at = Utc::now();
            diary.clone()
        }))
    }

    async fn delete_by_date(&self, date: NaiveDate) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.diaries.len();
        state.diaries.retain(|d| d.date != date);
        Ok((before - state.diaries.len()) as u64)
    }

    async fn ping(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiaryTransaction for MemoryTransaction {
    async fn cached_weather(&mut self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>> {
        Ok(self.guard.weather.get(&date).cloned())
    }

    async fn insert_diary(
        &mut self,
        date: NaiveDate,
        text: &str,
        weather: Option<&WeatherSnapshot>,
    ) -> AppResult<Diary> {
        let now = Utc::now();
        let diary = Diary {
            id: self.guard.next_diary_id + self.pending.len() as i64 + 1,
            date,
            text: text.to_string(),
            condition: weather.map(|w| w.condition.clone()),
            icon: weather.map(|w| w.icon.clone()),
            temperature: weather.map(|w| w.temperature),
            created_at: now,
            updated_at: now,
        };
        self.pending.push(diary.clone());
        Ok(diary)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut guard, pending } = *self;
        guard.next_diary_id += pending.len() as i64;
        guard.diaries.extend(pending);
        Ok(())
    }
}

#[async_trait]
impl WeatherCache for MemoryStore {
    async fn upsert(&self, snapshot: &WeatherSnapshot) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.weather.insert(snapshot.date, snapshot.clone());
        Ok(())
    }

    async fn get(&self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>> {
        Ok(self.state.lock().await.weather.get(&date).cloned())
    }
}

#[async_trait]
impl MemoStore for MemoryStore {
    async fn save(&self, text: &str) -> AppResult<Memo> {
        let mut state = self.state.lock().await;
        let memo = Memo {
            id: state.memos.len() as i32 + 1,
            text: text.to_string(),
        };
        state.memos.push(memo.clone());
        Ok(memo)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Memo>> {
        let state = self.state.lock().await;
        Ok(state.memos.iter().find(|m| m.id == id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Memo>> {
        Ok(self.state.lock().await.memos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_rolls_back() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin_serializable().await.unwrap();
            tx.insert_diary(day(1), "draft", None).await.unwrap();
        }
        assert_eq!(store.diary_count().await, 0);

        let mut tx = store.begin_serializable().await.unwrap();
        let diary = tx.insert_diary(day(1), "kept", None).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(diary.id, 1);
        assert_eq!(store.diary_count().await, 1);
    }

    #[tokio::test]
    async fn test_find_between_is_inclusive_and_ordered() {
        let store = MemoryStore::new();
        let mut tx = store.begin_serializable().await.unwrap();
        for (d, text) in [(3, "c"), (1, "a"), (2, "b"), (4, "d")] {
            tx.insert_diary(day(d), text, None).await.unwrap();
        }
        tx.commit().await.unwrap();

        let found = store.find_between(day(1), day(3)).await.unwrap();
        let texts: Vec<&str> = found.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
