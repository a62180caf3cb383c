use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, UserRecord};
use crate::error::{ApiError, ApiResult};

const EMAIL_TAKEN: &str = "Email already registered";

const USER_COLUMNS: &str =
    "id, email, display_name, provider, last_sign_in_at, email_confirmed_at, created_at";

impl UserRecord {
    /// All accounts, newest first.
    pub async fn list(db: &PgPool) -> ApiResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> ApiResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> ApiResult<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(found)
    }

    /// True when some account other than `except` already uses `email`.
    pub async fn email_taken(db: &PgPool, email: &str, except: Option<Uuid>) -> ApiResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    /// A concurrent insert of the same email surfaces as `Conflict`.
    pub async fn create(db: &PgPool, new: &NewUser) -> ApiResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, display_name, provider, password_hash)
            VALUES ($1, $2, 'email', $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.display_name)
        .bind(&new.password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, EMAIL_TAKEN))?;
        Ok(row)
    }

    /// A changed address is no longer confirmed.
    pub async fn update_email(db: &PgPool, id: Uuid, email: &str) -> ApiResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users
               SET email = $2,
                   email_confirmed_at = CASE WHEN email = $2 THEN email_confirmed_at END
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, EMAIL_TAKEN))?;
        Ok(row)
    }

    /// Removes the account; payments and settings go with it.
    pub async fn delete(db: &PgPool, id: Uuid) -> ApiResult<bool> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM user_settings WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM payments WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(done.rows_affected() > 0)
    }
}
