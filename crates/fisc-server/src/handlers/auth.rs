//! Authentication handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{token, AppError, AppState, AuthUser};
use fisc_core::models::User;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus the user it belongs to
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Shape check only: one `@`, dotted domain
fn email_looks_valid(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// POST /api/auth/register - Create an account and issue a token
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    if !email_looks_valid(&email) {
        return Err(AppError::bad_request("Invalid email address"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    if state.db.get_user_by_email(&email)?.is_some() {
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = fisc_core::auth::hash_password(&req.password)?;
    let user = state.db.create_user(&email, name, &password_hash)?;
    let token = token::issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/login - Verify credentials and issue a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    // Same response for unknown email and wrong password
    let invalid = || AppError::unauthorized("Invalid email or password");

    let (user, stored_hash) = state.db.get_user_by_email(&email)?.ok_or_else(invalid)?;
    if !fisc_core::auth::verify_password(&req.password, &stored_hash)? {
        return Err(invalid());
    }

    let token = token::issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(auth.id)?
        .ok_or_else(|| AppError::unauthorized("Not authorized, user not found"))?;
    Ok(Json(user))
}
