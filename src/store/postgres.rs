use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppResult;
use crate::models::diary::Diary;
use crate::models::memo::Memo;
use crate::models::weather::WeatherSnapshot;
use crate::store::{DiaryStore, DiaryTransaction, MemoStore, WeatherCache};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn begin_diary_tx(&self) -> AppResult<PgDiaryTransaction> {
        let mut tx = self.db.begin().await?;
        // Must be the first statement of the transaction.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        Ok(PgDiaryTransaction { tx })
    }
}

pub struct PgDiaryTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl DiaryStore for PgStore {
    async fn begin_serializable(&self) -> AppResult<Box<dyn DiaryTransaction>> {
        Ok(Box::new(self.begin_diary_tx().await?))
    }

    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Vec<Diary>> {
        let diaries = sqlx::query_as::<_, Diary>(
            "SELECT * FROM diary WHERE date = $1 ORDER BY id ASC",
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(diaries)
    }

    async fn find_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Diary>> {
        let diaries = sqlx::query_as::<_, Diary>(
            r#"
            SELECT * FROM diary
            WHERE date BETWEEN $1 AND $2
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(diaries)
    }

    async fn update_first_text(&self, date: NaiveDate, text: &str) -> AppResult<Option<Diary>> {
        let diary = sqlx::query_as::<_, Diary>(
            r#"
            UPDATE diary SET text = $2, updated_at = NOW()
            WHERE id = (
                SELECT id FROM diary WHERE date = $1 ORDER BY id ASC LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(text)
        .fetch_optional(&self.db)
        .await?;

        Ok(diary)
    }

    async fn delete_by_date(&self, date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM diary WHERE date = $1")
            .bind(date)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .is_ok()
    }
}

#[async_trait]
impl DiaryTransaction for PgDiaryTransaction {
    async fn cached_weather(&mut self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>> {
        let snapshot = sqlx::query_as::<_, WeatherSnapshot>(
            "SELECT date, condition, icon, temperature FROM date_weather WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(snapshot)
    }

    async fn insert_diary(
        &mut self,
        date: NaiveDate,
        text: &str,
        weather: Option<&WeatherSnapshot>,
    ) -> AppResult<Diary> {
        let diary = sqlx::query_as::<_, Diary>(
            r#"
            INSERT INTO diary (date, text, condition, icon, temperature)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(text)
        .bind(weather.map(|w| w.condition.as_str()))
        .bind(weather.map(|w| w.icon.as_str()))
        .bind(weather.map(|w| w.temperature))
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(diary)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl WeatherCache for PgStore {
    async fn upsert(&self, snapshot: &WeatherSnapshot) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO date_weather (date, condition, icon, temperature)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (date) DO UPDATE SET
                condition = EXCLUDED.condition,
                icon = EXCLUDED.icon,
                temperature = EXCLUDED.temperature
            "#,
        )
        .bind(snapshot.date)
        .bind(&snapshot.condition)
        .bind(&snapshot.icon)
        .bind(snapshot.temperature)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn get(&self, date: NaiveDate) -> AppResult<Option<WeatherSnapshot>> {
        let snapshot = sqlx::query_as::<_, WeatherSnapshot>(
            "SELECT date, condition, icon, temperature FROM date_weather WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(snapshot)
    }
}

#[async_trait]
impl MemoStore for PgStore {
    async fn save(&self, text: &str) -> AppResult<Memo> {
        let memo = sqlx::query_as::<_, Memo>(
            "INSERT INTO memos (text) VALUES ($1) RETURNING id, text",
        )
        .bind(text)
        .fetch_one(&self.db)
        .await?;

        Ok(memo)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Memo>> {
        let memo = sqlx::query_as::<_, Memo>("SELECT id, text FROM memos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(memo)
    }

    async fn find_all(&self) -> AppResult<Vec<Memo>> {
        let memos = sqlx::query_as::<_, Memo>("SELECT id, text FROM memos ORDER BY id ASC")
            .fetch_all(&self.db)
            .await?;

        Ok(memos)
    }
}
