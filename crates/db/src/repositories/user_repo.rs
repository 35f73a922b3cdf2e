//! Repository for the `users` table.

use sqlx::{PgPool, Postgres, Transaction};
use wardrobe_core::types::DbId;

use crate::models::user::User;

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, account, nickname, avatar_url, created_at";

/// Provides lookups for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check that a user exists, within a transaction.
    pub async fn exists_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(count > 0)
    }
}
