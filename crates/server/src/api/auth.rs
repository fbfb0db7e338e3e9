//! 认证 API 路由：注册、登录、当前用户信息。

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use reviewhub_api_types::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserProfile,
};
use reviewhub_core::domain::Role;

use super::error::ApiError;
use super::state::AppState;
use crate::auth::{AuthUser, hash_password, verify_password};
use crate::repository::{NewUser, UserRecord};

/// 创建认证路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
}

pub(super) fn user_profile(user: &UserRecord) -> UserProfile {
    UserProfile {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

/// 注册新用户。
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim();

    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("password is required".to_string()));
    }

    let role: Role = payload
        .role
        .parse()
        .map_err(|_| ApiError::Validation("Role must be student or mentor.".to_string()))?;
    if !role.is_self_assignable() {
        return Err(ApiError::Validation(
            "Role must be student or mentor.".to_string(),
        ));
    }

    let existing = state
        .users
        .find_by_email(email)
        .await
        .map_err(ApiError::Internal)?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered.".to_string()));
    }

    let password_hash = hash_password(&payload.password).map_err(ApiError::Internal)?;
    let user = state
        .users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
        })
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully.".to_string(),
        user: user_profile(&user),
    }))
}

/// 校验凭证并签发访问令牌。
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .find_by_email(payload.email.trim())
        .await
        .map_err(ApiError::Internal)?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    };

    if !user.is_active || !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let access_token = state.tokens.issue(user.id).map_err(ApiError::Internal)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user_profile(&user),
    }))
}

/// 返回当前登录用户的信息。
async fn me(user: AuthUser) -> Json<UserProfile> {
    Json(user_profile(&user.0))
}
