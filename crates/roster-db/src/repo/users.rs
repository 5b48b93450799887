use super::prelude::*;

/// Result of an insert attempt. A taken email never mutates the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(User),
    EmailTaken,
}

pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts `user` with a single `INSERT .. RETURNING` statement.
    ///
    /// The unique constraint on `users.email` is the only duplicate check, so
    /// concurrent inserts of the same email resolve to one `Inserted` and the
    /// rest `EmailTaken`. The statement is its own transaction and takes the
    /// write lock up front, so the busy timeout covers contention.
    pub async fn create(&self, user: &NewUser) -> Result<InsertOutcome, sqlx_core::Error> {
        let inserted = query_as!(
            User,
            r#"
            INSERT INTO users (username, email)
            VALUES (?1, ?2)
            RETURNING id, username, email
            "#,
            user.username(),
            user.email()
        )
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(created) => Ok(InsertOutcome::Inserted(created)),
            Err(err) if is_unique_violation(&err) => {
                tracing::debug!(
                    event = "user_insert_unique_violation",
                    "Unique constraint rejected insert"
                );
                Ok(InsertOutcome::EmailTaken)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, username, email
            FROM users
            WHERE id = ?1
            "#,
            id
        )
        .fetch_optional(self.pool)
        .await
    }

    /// Lookup by the unique key; not on the insert path.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, username, email
            FROM users
            WHERE email = ?1
            "#,
            email
        )
        .fetch_optional(self.pool)
        .await
    }

    /// All users in creation order.
    pub async fn list_all(&self) -> Result<Vec<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, username, email
            FROM users
            ORDER BY id ASC
            "#
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn count_by_email(&self, email: &str) -> Result<i64, sqlx_core::Error> {
        let row = query!(
            r#"
            SELECT COUNT(*) AS total
            FROM users
            WHERE email = ?1
            "#,
            email
        )
        .fetch_one(self.pool)
        .await?;
        row.try_get::<i64, _>("total")
    }
}

fn is_unique_violation(err: &sqlx_core::Error) -> bool {
    matches!(err, sqlx_core::Error::Database(db_err) if db_err.is_unique_violation())
}
