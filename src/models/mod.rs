pub mod diary;
pub mod memo;
pub mod weather;
