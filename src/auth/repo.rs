use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::ApiResult;

/// Login material for an account. Accounts created without a password
/// cannot sign in.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
}

impl Credentials {
    pub async fn find_by_email(db: &PgPool, email: &str) -> ApiResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, Credentials>(
            r#"
            SELECT id, email, display_name, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn touch_last_sign_in(db: &PgPool, user_id: Uuid) -> ApiResult<()> {
        sqlx::query("UPDATE users SET last_sign_in_at = now() WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_password_hash(db: &PgPool, user_id: Uuid, hash: &str) -> ApiResult<bool> {
        let done = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(hash)
            .execute(db)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Inserts the bootstrap administrator unless the email is already taken.
    /// Returns true when a row was created.
    pub async fn seed_admin(db: &PgPool, email: &str, hash: &str) -> ApiResult<bool> {
        let done = sqlx::query(
            r#"
            INSERT INTO users (email, display_name, provider, password_hash, email_confirmed_at)
            VALUES ($1, 'Administrator', 'email', $2, now())
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(hash)
        .execute(db)
        .await?;
        Ok(done.rows_affected() > 0)
    }
}
