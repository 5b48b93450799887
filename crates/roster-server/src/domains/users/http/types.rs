use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) const STATUS_SUCCESS: &str = "success";
pub(crate) const STATUS_CREATED: &str = "Success";
pub(crate) const STATUS_FAIL: &str = "fail";

#[derive(Serialize)]
pub(crate) struct MessageResponse {
    pub(crate) status: &'static str,
    pub(crate) message: String,
}

impl MessageResponse {
    pub(crate) fn fail(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAIL,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct DataResponse<T: Serialize> {
    pub(crate) status: &'static str,
    pub(crate) data: T,
}

/// Body of `POST /users`. Only a JSON object is accepted; a sequence or
/// scalar body fails to deserialize.
#[derive(Debug, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub(crate) struct CreateUserRequest {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
}

impl TryFrom<Map<String, Value>> for CreateUserRequest {
    type Error = String;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            username: take_text(&mut body, "username")?,
            email: take_text(&mut body, "email")?,
        })
    }
}

fn take_text(body: &mut Map<String, Value>, field: &str) -> Result<Option<String>, String> {
    match body.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(format!("{field} must be a string")),
    }
}

#[derive(Deserialize)]
pub(crate) struct IndexForm {
    pub(crate) username: String,
    pub(crate) email: String,
}
