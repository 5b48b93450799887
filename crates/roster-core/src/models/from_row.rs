#[cfg(feature = "sqlite")]
use sqlx_core::from_row::FromRow;
#[cfg(feature = "sqlite")]
use sqlx_core::row::Row;
#[cfg(feature = "sqlite")]
use sqlx_sqlite::SqliteRow;

#[cfg(feature = "sqlite")]
use super::structs::User;

macro_rules! impl_from_row {
    ($ty:ty, $row:ident => $body:block) => {
        #[cfg(feature = "sqlite")]
        impl FromRow<'_, SqliteRow> for $ty {
            fn from_row($row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
                $body
            }
        }
    };
}

impl_from_row!(User, row => {
    Ok(Self {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
    })
});
