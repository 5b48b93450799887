use roster_core::{NewUser, User};
use roster_db::repo::{InsertOutcome, UserRepo};
use thiserror::Error;

use crate::app::AppState;
use crate::infra::metrics;

pub struct CreateUserCommand {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserServiceError {
    #[error("invalid_payload: {0}")]
    InvalidPayload(&'static str),
    #[error("already_exists: {0}")]
    AlreadyExists(String),
    #[error("not_found")]
    NotFound,
    #[error("db_error")]
    Db,
}

/// Non-numeric and out-of-range identifiers never reach the store.
pub fn parse_user_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

pub async fn create_user(
    state: &AppState,
    cmd: CreateUserCommand,
) -> Result<User, UserServiceError> {
    let new_user = match NewUser::new(cmd.username, cmd.email) {
        Ok(new_user) => new_user,
        Err(err) => {
            metrics::user_created("invalid", "api");
            tracing::info!(
                event = "user_create_invalid",
                field = err.field(),
                "Rejected user payload"
            );
            return Err(UserServiceError::InvalidPayload(err.field()));
        }
    };

    let repo = UserRepo::new(&state.db);
    match repo.create(&new_user).await {
        Ok(InsertOutcome::Inserted(user)) => {
            metrics::user_created("created", "api");
            tracing::info!(event = "user_created", user_id = user.id, "User created");
            Ok(user)
        }
        Ok(InsertOutcome::EmailTaken) => {
            metrics::user_created("duplicate", "api");
            tracing::info!(event = "user_create_duplicate", "Email already registered");
            Err(UserServiceError::AlreadyExists(new_user.email().to_string()))
        }
        Err(err) => {
            metrics::user_created("error", "api");
            tracing::error!(event = "user_create_failed", error = %err);
            Err(UserServiceError::Db)
        }
    }
}

pub async fn get_user(state: &AppState, raw_id: &str) -> Result<User, UserServiceError> {
    let Some(id) = parse_user_id(raw_id) else {
        tracing::debug!(event = "user_id_unparsable", raw_id, "User id is not an integer");
        return Err(UserServiceError::NotFound);
    };
    let repo = UserRepo::new(&state.db);
    match repo.get_by_id(id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(UserServiceError::NotFound),
        Err(err) => {
            tracing::error!(event = "user_get_failed", user_id = id, error = %err);
            Err(UserServiceError::Db)
        }
    }
}

pub async fn list_users(state: &AppState) -> Result<Vec<User>, UserServiceError> {
    let repo = UserRepo::new(&state.db);
    repo.list_all().await.map_err(|err| {
        tracing::error!(event = "user_list_failed", error = %err);
        UserServiceError::Db
    })
}

/// Insert path for the index page form.
///
/// Unlike [`create_user`] it performs no presence validation and does not
/// report duplicates to the caller: a taken email leaves the store unchanged
/// and is only logged.
pub async fn add_user_from_form(
    state: &AppState,
    username: String,
    email: String,
) -> Result<Option<User>, UserServiceError> {
    if username.is_empty() || email.is_empty() {
        tracing::warn!(
            event = "index_form_unvalidated",
            username_empty = username.is_empty(),
            email_empty = email.is_empty(),
            "Index form accepted an empty field"
        );
    }
    let new_user = NewUser::unchecked(username, email);
    let repo = UserRepo::new(&state.db);
    match repo.create(&new_user).await {
        Ok(InsertOutcome::Inserted(user)) => {
            metrics::user_created("created", "form");
            tracing::info!(event = "user_created", user_id = user.id, source = "form");
            Ok(Some(user))
        }
        Ok(InsertOutcome::EmailTaken) => {
            metrics::user_created("duplicate", "form");
            tracing::warn!(
                event = "index_form_duplicate_ignored",
                "Index form submitted an existing email"
            );
            Ok(None)
        }
        Err(err) => {
            metrics::user_created("error", "form");
            tracing::error!(event = "user_create_failed", source = "form", error = %err);
            Err(UserServiceError::Db)
        }
    }
}
