use axum::{
    extract::{FromRef, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest, UpdateEmailRequest, UpdatePasswordRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::Credentials,
        services::{check_password_change, issue_tokens, normalize_email, public_user},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::UserRecord,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/email", put(update_email))
        .route("/me/password", put(update_password))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email)?;

    let creds = match Credentials::find_by_email(&state.db, &email).await? {
        Some(c) => c,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let Some(hash) = creds.password_hash.as_deref() else {
        warn!(user_id = %creds.id, "login on account without password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, hash)? {
        warn!(email = %email, user_id = %creds.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Credentials::touch_last_sign_in(&state.db, creds.id).await?;

    let keys = JwtKeys::from_ref(&state);
    let response = issue_tokens(&keys, public_user(creds.id, creds.email, creds.display_name))?;
    info!(user_id = %response.user.id, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = UserRecord::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    let response = issue_tokens(&keys, public_user(user.id, user.email, user.display_name))?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserRecord>> {
    UserRecord::find_by_id(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::unauthorized("User not found"))
}

#[instrument(skip(state, payload))]
pub async fn update_email(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateEmailRequest>,
) -> ApiResult<Json<UserRecord>> {
    let email = normalize_email(&payload.email)?;

    if UserRecord::email_taken(&state.db, &email, Some(user_id)).await? {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let user = UserRecord::update_email(&state.db, user_id, &email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    info!(user_id = %user.id, "email updated");
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<axum::http::StatusCode> {
    check_password_change(&payload.password, &payload.confirm_password)?;

    let hash = hash_password(&payload.password)?;
    if !Credentials::set_password_hash(&state.db, user_id, &hash).await? {
        return Err(ApiError::unauthorized("User not found"));
    }

    info!(user_id = %user_id, "password updated");
    Ok(axum::http::StatusCode::NO_CONTENT)
}
