use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{PaymentDraft, PaymentRecord, PaymentRow, PaymentStatus};
use crate::error::ApiResult;

const PAYMENT_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.amount, p.currency, p.payment_method, p.status,
           p.created_at, u.email AS user_email, u.display_name AS user_display_name
      FROM payments p
      LEFT JOIN users u ON u.id = p.user_id
"#;

/// All payments, newest first.
pub async fn list(db: &PgPool) -> ApiResult<Vec<PaymentRecord>> {
    let rows = sqlx::query_as::<_, PaymentRow>(&format!(
        "{PAYMENT_SELECT} ORDER BY p.created_at DESC"
    ))
    .fetch_all(db)
    .await?;
    PaymentRecord::from_rows(rows)
}

/// The `limit` most recent payments.
pub async fn list_recent(db: &PgPool, limit: i64) -> ApiResult<Vec<PaymentRecord>> {
    let rows = sqlx::query_as::<_, PaymentRow>(&format!(
        "{PAYMENT_SELECT} ORDER BY p.created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(db)
    .await?;
    PaymentRecord::from_rows(rows)
}

/// Payments with `status` booked during the UTC calendar `year`.
pub async fn list_by_status_in_year(
    db: &PgPool,
    status: PaymentStatus,
    year: i32,
) -> ApiResult<Vec<PaymentRecord>> {
    let rows = sqlx::query_as::<_, PaymentRow>(&format!(
        r#"{PAYMENT_SELECT}
         WHERE p.status = $1
           AND p.created_at >= make_timestamptz($2, 1, 1, 0, 0, 0, 'UTC')
           AND p.created_at < make_timestamptz($2 + 1, 1, 1, 0, 0, 0, 'UTC')
         ORDER BY p.created_at ASC"#
    ))
    .bind(status.as_str())
    .bind(year)
    .fetch_all(db)
    .await?;
    PaymentRecord::from_rows(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> ApiResult<Option<PaymentRecord>> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!("{PAYMENT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    row.map(PaymentRecord::try_from).transpose()
}

pub async fn insert(db: &PgPool, draft: &PaymentDraft) -> ApiResult<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO payments (user_id, amount, currency, payment_method, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(draft.user_id)
    .bind(draft.amount)
    .bind(&draft.currency)
    .bind(&draft.payment_method)
    .bind(draft.status.as_str())
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Returns false when no payment has this id.
pub async fn update(db: &PgPool, id: Uuid, draft: &PaymentDraft) -> ApiResult<bool> {
    let done = sqlx::query(
        r#"
        UPDATE payments
           SET user_id = $2, amount = $3, currency = $4, payment_method = $5, status = $6
         WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(draft.user_id)
    .bind(draft.amount)
    .bind(&draft.currency)
    .bind(&draft.payment_method)
    .bind(draft.status.as_str())
    .execute(db)
    .await?;
    Ok(done.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, id: Uuid) -> ApiResult<bool> {
    let done = sqlx::query("DELETE FROM payments WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(done.rows_affected() > 0)
}
