//! Shared fixtures for unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::WeatherMissPolicy;
use crate::models::weather::WeatherSnapshot;
use crate::services::DiaryService;
use crate::store::memory::MemoryStore;
use crate::weather::parser::parse_weather;
use crate::weather::{WeatherError, WeatherSource};
use crate::AppState;

pub const CLEAR_BODY: &str = r#"{"weather":[{"main":"Clear","icon":"01d"}],"main":{"temp":280.0}}"#;

/// Lacks the `weather` array.
pub const MALFORMED_BODY: &str = r#"{"main":{"temp":280.0}}"#;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

/// Weather source that parses a canned body, so parse failures behave like
/// the real client.
pub struct FakeWeather {
    today: NaiveDate,
    body: Mutex<String>,
    calls: AtomicUsize,
}

impl FakeWeather {
    pub fn clear(today: NaiveDate) -> Self {
        Self {
            today,
            body: Mutex::new(CLEAR_BODY.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_body(&self, body: &str) {
        *self.body.lock().unwrap() = body.to_string();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn current_weather(&self) -> Result<WeatherSnapshot, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body.lock().unwrap().clone();
        parse_weather(&body, self.today)
    }
}

/// App state over a fresh in-memory store and a fake source reporting
/// clear weather for `day(20)`.
pub fn test_app_state() -> (AppState, Arc<FakeWeather>) {
    test_app_state_with(MemoryStore::new())
}

pub fn test_app_state_with(store: MemoryStore) -> (AppState, Arc<FakeWeather>) {
    let weather = Arc::new(FakeWeather::clear(day(20)));
    let diaries = DiaryService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        weather.clone(),
        WeatherMissPolicy::Current,
    );

    let state = AppState {
        diaries: Arc::new(diaries),
        memos: Arc::new(store),
    };
    (state, weather)
}
