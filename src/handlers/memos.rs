use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::models::memo::{CreateMemoRequest, Memo};
use crate::AppState;

pub async fn create_memo(
    State(state): State<AppState>,
    Json(body): Json<CreateMemoRequest>,
) -> AppResult<(StatusCode, Json<Memo>)> {
    let memo = state.memos.save(&body.text).await?;
    Ok((StatusCode::CREATED, Json(memo)))
}

pub async fn list_memos(State(state): State<AppState>) -> AppResult<Json<Vec<Memo>>> {
    Ok(Json(state.memos.find_all().await?))
}

pub async fn get_memo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Memo>> {
    let memo = state
        .memos
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Memo not found".into()))?;

    Ok(Json(memo))
}
