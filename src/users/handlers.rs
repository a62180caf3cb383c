use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, UserListQuery},
    repo_types::{NewUser, UserRecord},
};
use crate::{
    auth::{
        extractors::AuthUser,
        password::hash_password,
        services::{check_password, normalize_email},
    },
    error::{ApiError, ApiResult},
    reporting::{filter_records, StatusFilter},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserRecord>>> {
    let users = UserRecord::list(&state.db).await?;
    Ok(Json(filter_records(users, &query.q, &StatusFilter::All)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserRecord>> {
    UserRecord::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("User"))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserRecord>)> {
    let email = normalize_email(&payload.email)?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            check_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    if UserRecord::email_taken(&state.db, &email, None).await? {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let user = UserRecord::create(
        &state.db,
        &NewUser {
            email,
            display_name: payload.display_name(),
            password_hash,
        },
    )
    .await?;

    info!(user_id = %user.id, created_by = %actor, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Deletes an account together with its payments and settings.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if id == actor {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }
    if !UserRecord::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User"));
    }
    info!(user_id = %id, deleted_by = %actor, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
