use serde::{Deserialize, Serialize};

/// A stored user row. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Insert request that passed presence validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    email: String,
}

impl NewUser {
    /// Both fields must be present and non-empty; the first missing one is reported.
    pub fn new(username: Option<String>, email: Option<String>) -> Result<Self, MissingField> {
        let username = username
            .filter(|value| !value.is_empty())
            .ok_or(MissingField::new("username"))?;
        let email = email
            .filter(|value| !value.is_empty())
            .ok_or(MissingField::new("email"))?;
        Ok(Self { username, email })
    }

    /// Skips presence validation. Only the index form uses this; the store's
    /// `NOT NULL` and `UNIQUE` constraints still apply.
    #[must_use]
    pub fn unchecked(username: String, email: String) -> Self {
        Self { username, email }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField {
    field: &'static str,
}

impl MissingField {
    const fn new(field: &'static str) -> Self {
        Self { field }
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing field: {}", self.field)
    }
}

impl std::error::Error for MissingField {}
