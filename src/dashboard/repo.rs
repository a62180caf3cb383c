use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{error::ApiResult, payments::PaymentStatus};

pub async fn count_users(db: &PgPool) -> ApiResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Sum of completed payment amounts.
pub async fn completed_revenue(db: &PgPool) -> ApiResult<Decimal> {
    let total: Decimal =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = $1")
            .bind(PaymentStatus::Completed.as_str())
            .fetch_one(db)
            .await?;
    Ok(total)
}

/// Users whose settings mark an active subscription.
pub async fn count_active_subscriptions(db: &PgPool) -> ApiResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_settings WHERE payment_status")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn count_payments_with_status(db: &PgPool, status: PaymentStatus) -> ApiResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(db)
        .await?;
    Ok(n)
}
