use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod state;

use crate::{auth::repo::PgUserRepository, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "auth_backend=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);

    // The pool is owned here and closed after the server stops.
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;
    auth::password::prime_dummy_hash().await;

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let state = AppState::new(config.clone(), users);

    let result = app::serve(app::build_app(state), &config).await;

    pool.close().await;
    tracing::info!("database connection closed");
    result
}
