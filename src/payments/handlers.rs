use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{PaymentListQuery, PaymentRequest, PaymentView},
    repo,
    repo_types::PaymentDraft,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    reporting::filter_records,
    state::AppState,
    users::UserRecord,
};

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route(
            "/payments/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> ApiResult<Json<Vec<PaymentView>>> {
    let payments = repo::list(&state.db).await?;
    let views = filter_records(payments, &query.q, &query.status)
        .into_iter()
        .map(PaymentView::from)
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PaymentView>> {
    let payment = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Payment"))?;
    Ok(Json(payment.into()))
}

async fn checked_draft(state: &AppState, payload: PaymentRequest) -> ApiResult<PaymentDraft> {
    let draft = payload.into_draft()?;
    if !UserRecord::exists(&state.db, draft.user_id).await? {
        return Err(ApiError::bad_request("Unknown user"));
    }
    Ok(draft)
}

#[instrument(skip(state, payload))]
pub async fn create_payment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentView>)> {
    let draft = checked_draft(&state, payload).await?;
    let id = repo::insert(&state.db, &draft).await?;
    let payment = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Payment"))?;

    info!(payment_id = %id, user_id = %draft.user_id, created_by = %actor, "payment created");
    Ok((StatusCode::CREATED, Json(payment.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_payment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult<Json<PaymentView>> {
    let draft = checked_draft(&state, payload).await?;
    if !repo::update(&state.db, id, &draft).await? {
        return Err(ApiError::NotFound("Payment"));
    }
    let payment = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Payment"))?;

    info!(payment_id = %id, updated_by = %actor, "payment updated");
    Ok(Json(payment.into()))
}

#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Payment"));
    }
    info!(payment_id = %id, deleted_by = %actor, "payment deleted");
    Ok(StatusCode::NO_CONTENT)
}
