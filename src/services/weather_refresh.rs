use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};

use crate::services::DiaryService;

/// First instant strictly after `now` whose time of day is `at`.
pub fn next_refresh_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        (now.date() + Duration::days(1)).and_time(at)
    }
}

/// Refreshes the weather cache once a day at local time `at`.
pub fn spawn_weather_refresh_worker(service: Arc<DiaryService>, at: NaiveTime) {
    tokio::spawn(async move {
        loop {
            let now = Local::now().naive_local();
            let next = next_refresh_after(now, at);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(next_run = %next, "Weather refresh scheduled");

            tokio::time::sleep(wait).await;

            match service.refresh_weather_cache().await {
                Ok(snapshot) => {
                    tracing::info!(date = %snapshot.date, "Weather refresh worker: cache updated");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Weather refresh worker error");
                }
            }
        }
    });
}
