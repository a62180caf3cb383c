use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::{
    dto::{MetricsResponse, RecentQuery, RevenueQuery, RevenueResponse},
    repo,
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiResult,
    payments::{dto::PaymentView, repo as payments_repo, PaymentStatus},
    reporting::aggregate_monthly_revenue,
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/metrics", get(metrics))
        .route("/dashboard/revenue", get(monthly_revenue))
        .route("/dashboard/recent-payments", get(recent_payments))
}

#[instrument(skip(state))]
pub async fn metrics(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> ApiResult<Json<MetricsResponse>> {
    let (users, revenue, subscriptions, pending) = tokio::try_join!(
        repo::count_users(&state.db),
        repo::completed_revenue(&state.db),
        repo::count_active_subscriptions(&state.db),
        repo::count_payments_with_status(&state.db, PaymentStatus::Pending),
    )?;
    Ok(Json(MetricsResponse::new(users, revenue, subscriptions, pending)))
}

#[instrument(skip(state))]
pub async fn monthly_revenue(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(query): Query<RevenueQuery>,
) -> ApiResult<Json<RevenueResponse>> {
    let year = query.year_or(OffsetDateTime::now_utc().year())?;
    let completed =
        payments_repo::list_by_status_in_year(&state.db, PaymentStatus::Completed, year).await?;
    debug!(year, payments = completed.len(), "aggregating revenue");
    let months = aggregate_monthly_revenue(&completed, year);
    Ok(Json(RevenueResponse::new(year, months)))
}

#[instrument(skip(state))]
pub async fn recent_payments(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<PaymentView>>> {
    let payments = payments_repo::list_recent(&state.db, query.limit()).await?;
    Ok(Json(payments.into_iter().map(PaymentView::from).collect()))
}
