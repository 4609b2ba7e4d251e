use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Memo {
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMemoRequest {
    pub text: String,
}
