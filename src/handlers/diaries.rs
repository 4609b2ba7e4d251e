use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::AppResult;
use crate::models::diary::{
    DeleteDiaryResponse, Diary, DiaryDateQuery, DiaryRangeQuery, WriteDiaryRequest,
};
use crate::AppState;

pub async fn create_diary(
    State(state): State<AppState>,
    Json(body): Json<WriteDiaryRequest>,
) -> AppResult<(StatusCode, Json<Diary>)> {
    body.validate()?;
    let diary = state.diaries.create_diary(body.date, &body.text).await?;
    Ok((StatusCode::CREATED, Json(diary)))
}

pub async fn read_diary(
    State(state): State<AppState>,
    Query(query): Query<DiaryDateQuery>,
) -> AppResult<Json<Vec<Diary>>> {
    let diaries = state.diaries.read_diary(query.date).await?;
    Ok(Json(diaries))
}

pub async fn read_diaries(
    State(state): State<AppState>,
    Query(query): Query<DiaryRangeQuery>,
) -> AppResult<Json<Vec<Diary>>> {
    let diaries = state
        .diaries
        .read_diaries(query.start_date, query.end_date)
        .await?;
    Ok(Json(diaries))
}

pub async fn update_diary(
    State(state): State<AppState>,
    Json(body): Json<WriteDiaryRequest>,
) -> AppResult<Json<Diary>> {
    body.validate()?;
    let diary = state.diaries.update_diary(body.date, &body.text).await?;
    Ok(Json(diary))
}

pub async fn delete_diary(
    State(state): State<AppState>,
    Query(query): Query<DiaryDateQuery>,
) -> AppResult<Json<DeleteDiaryResponse>> {
    let deleted = state.diaries.delete_diary(query.date).await?;
    Ok(Json(DeleteDiaryResponse {
        deleted,
        date: query.date,
    }))
}
