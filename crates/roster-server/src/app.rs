use axum::{extract::DefaultBodyLimit, Router};
use std::time::Instant;

use crate::config::ServerConfig;
use roster_db::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub started_at: Instant,
    pub config: ServerConfig,
}

impl AppState {
    #[must_use]
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db,
            started_at: Instant::now(),
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;
    crate::http::router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
