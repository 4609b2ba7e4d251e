use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod store;
mod weather;

#[cfg(test)]
mod test_support;

use config::Config;
use services::weather_refresh::spawn_weather_refresh_worker;
use services::DiaryService;
use store::{MemoStore, PgStore};
use weather::WeatherClient;

#[derive(Clone)]
pub struct AppState {
    pub diaries: Arc<DiaryService>,
    pub memos: Arc<dyn MemoStore>,
}

/// All routes, without CORS. Shared by `main` and the router tests.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        // Diaries
        .route(
            "/api/diaries",
            post(handlers::diaries::create_diary)
                .get(handlers::diaries::read_diary)
                .put(handlers::diaries::update_diary)
                .delete(handlers::diaries::delete_diary),
        )
        .route("/api/diaries/range", get(handlers::diaries::read_diaries))
        // Weather cache
        .route(
            "/api/weather/refresh",
            post(handlers::weather::refresh_weather),
        )
        .route(
            "/api/weather/:date",
            get(handlers::weather::get_cached_weather),
        )
        // Memos
        .route(
            "/api/memos",
            post(handlers::memos::create_memo).get(handlers::memos::list_memos),
        )
        .route("/api/memos/:id", get(handlers::memos::get_memo))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_diary_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    // Database
    let db = db::create_pool(&config.database_url).await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    tracing::info!("Database migrations applied");

    let store = Arc::new(PgStore::new(db));
    let weather = WeatherClient::new(
        config.weather_api_base.as_str(),
        config.weather_city.as_str(),
        config.weather_api_key.as_str(),
        config.weather_timeout,
    )?;

    let diaries = Arc::new(DiaryService::new(
        store.clone(),
        store.clone(),
        Arc::new(weather),
        config.weather_miss_policy,
    ));

    // Daily cache refresh (01:00 local by default)
    spawn_weather_refresh_worker(diaries.clone(), config.weather_refresh_at);

    let state = AppState {
        diaries,
        memos: store,
    };

    let allowed_origins: Vec<axum::http::HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    let app = router(state)
        .layer(cors)
        .layer(CompressionLayer::new());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
