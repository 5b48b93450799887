use askama::Template;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use roster_core::User;

use crate::app::AppState;
use crate::domains::users::service::{self, UserServiceError};

use super::types::IndexForm;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    users: &'a [User],
}

/// Renders the listing page with the add-user form.
pub fn render_index(users: &[User]) -> Result<String, askama::Error> {
    IndexTemplate { users }.render()
}

fn render_failed(err: askama::Error) -> Response {
    tracing::error!(event = "index_render_failed", error = %err);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

// The service has already logged the store error.
fn store_unavailable(err: &UserServiceError) -> Response {
    tracing::warn!(event = "index_store_unavailable", error = %err);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

#[tracing::instrument(skip(state))]
pub(crate) async fn index(State(state): State<AppState>) -> Response {
    let users = match service::list_users(&state).await {
        Ok(users) => users,
        Err(err) => return store_unavailable(&err),
    };
    match render_index(&users) {
        Ok(body) => Html(body).into_response(),
        Err(err) => render_failed(err),
    }
}

#[tracing::instrument(skip(state, form))]
pub(crate) async fn submit_index_form(
    State(state): State<AppState>,
    form: Result<Form<IndexForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::info!(
                event = "index_form_rejected",
                reason = %rejection.body_text(),
                "Unreadable index form"
            );
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    match service::add_user_from_form(&state, form.username, form.email).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => store_unavailable(&err),
    }
}
