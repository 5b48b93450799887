use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app::AppState;
use crate::domains::users::service::{self, CreateUserCommand, UserServiceError};

use super::types::{
    CreateUserRequest, DataResponse, MessageResponse, STATUS_CREATED, STATUS_SUCCESS,
};

const INVALID_JSON: &str = "Invalid json";
const USER_NOT_FOUND: &str = "User does not exists";

pub(crate) fn map_user_error(error: UserServiceError) -> Response {
    match error {
        UserServiceError::InvalidPayload(_) => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::fail(INVALID_JSON)),
        )
            .into_response(),
        UserServiceError::AlreadyExists(email) => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::fail(format!(
                "Sorry. {email} already exists"
            ))),
        )
            .into_response(),
        UserServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::fail(USER_NOT_FOUND)),
        )
            .into_response(),
        UserServiceError::Db => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::fail("Internal error")),
        )
            .into_response(),
    }
}

pub(crate) async fn ping() -> impl IntoResponse {
    Json(MessageResponse {
        status: STATUS_SUCCESS,
        message: "pong!".to_string(),
    })
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::info!(
                event = "user_payload_rejected",
                reason = %rejection.body_text(),
                "Unparsable user payload"
            );
            return map_user_error(UserServiceError::InvalidPayload("body"));
        }
    };
    let command = CreateUserCommand {
        username: payload.username,
        email: payload.email,
    };
    match service::create_user(&state, command).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(MessageResponse {
                status: STATUS_CREATED,
                message: format!("{} was added", user.email),
            }),
        )
            .into_response(),
        Err(err) => map_user_error(err),
    }
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_users(State(state): State<AppState>) -> Response {
    match service::list_users(&state).await {
        Ok(users) => (
            StatusCode::OK,
            Json(DataResponse {
                status: STATUS_SUCCESS,
                data: users,
            }),
        )
            .into_response(),
        Err(err) => map_user_error(err),
    }
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match service::get_user(&state, &id).await {
        Ok(user) => (
            StatusCode::OK,
            Json(DataResponse {
                status: STATUS_SUCCESS,
                data: user,
            }),
        )
            .into_response(),
        Err(err) => map_user_error(err),
    }
}
