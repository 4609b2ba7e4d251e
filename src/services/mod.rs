pub mod diary_service;
pub mod weather_refresh;

pub use diary_service::DiaryService;
