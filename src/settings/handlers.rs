use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{NotificationRequest, SettingsRequest, SettingsResponse},
    repo::UserSettings,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
    users::UserRecord,
};

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id/settings", get(get_user_settings).put(save_user_settings))
        .route("/me/settings", get(get_my_settings).put(save_my_settings))
}

async fn ensure_user(state: &AppState, user_id: Uuid) -> ApiResult<()> {
    if !UserRecord::exists(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn get_user_settings(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<SettingsResponse>> {
    ensure_user(&state, user_id).await?;
    let stored = UserSettings::find_by_user(&state.db, user_id).await?;
    Ok(Json(SettingsResponse::resolve(user_id, stored)))
}

#[instrument(skip(state, payload))]
pub async fn save_user_settings(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    ensure_user(&state, user_id).await?;
    let saved = UserSettings::upsert(&state.db, user_id, payload.into()).await?;
    info!(
        user_id = %user_id,
        updated_by = %actor,
        payment_status = saved.payment_status,
        "user settings saved"
    );
    Ok(Json(saved.into()))
}

#[instrument(skip(state))]
pub async fn get_my_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<SettingsResponse>> {
    let stored = UserSettings::find_by_user(&state.db, user_id).await?;
    Ok(Json(SettingsResponse::resolve(user_id, stored)))
}

#[instrument(skip(state, payload))]
pub async fn save_my_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NotificationRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    ensure_user(&state, user_id).await?;
    let saved = UserSettings::set_notifications(&state.db, user_id, payload.notification_enable).await?;
    info!(user_id = %user_id, notification_enable = saved.notification_enable, "own settings saved");
    Ok(Json(saved.into()))
}
