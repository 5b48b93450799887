use axum::{routing::get, Router};

use crate::app::AppState;

mod handlers;
pub mod pages;
pub(crate) mod types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index).post(pages::submit_index_form))
        .route("/users/ping", get(handlers::ping))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/user/:id", get(handlers::get_user))
}
