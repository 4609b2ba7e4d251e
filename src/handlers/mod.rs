pub mod diaries;
pub mod health;
pub mod memos;
pub mod weather;
