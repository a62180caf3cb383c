use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{AuthResponse, PublicUser},
    jwt::JwtKeys,
    password::hash_password,
    repo::Credentials,
};
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims and lower-cases an email, rejecting malformed ones.
pub(crate) fn normalize_email(raw: &str) -> ApiResult<String> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email"));
    }
    Ok(email)
}

pub(crate) fn check_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("Password too short"));
    }
    Ok(())
}

/// Password change form: both entries must agree before length is checked.
pub(crate) fn check_password_change(password: &str, confirm: &str) -> ApiResult<()> {
    if password != confirm {
        return Err(ApiError::bad_request("Passwords don't match"));
    }
    check_password(password)
}

pub(crate) fn issue_tokens(keys: &JwtKeys, user: PublicUser) -> ApiResult<AuthResponse> {
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user,
    })
}

pub(crate) fn public_user(id: Uuid, email: String, display_name: Option<String>) -> PublicUser {
    PublicUser {
        id,
        email,
        display_name,
    }
}

/// Creates the configured administrator account if it does not exist yet.
pub async fn seed_admin(state: &AppState) -> anyhow::Result<()> {
    let Some(seed) = state.config.admin_seed.as_ref() else {
        return Ok(());
    };
    let email = normalize_email(&seed.email).context("ADMIN_EMAIL")?;
    check_password(&seed.password).context("ADMIN_PASSWORD")?;
    let hash = hash_password(&seed.password)?;
    if Credentials::seed_admin(&state.db, &email, &hash).await? {
        info!(email = %email, "administrator account created");
    }
    Ok(())
}
