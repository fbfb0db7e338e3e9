use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reviewhub_core::domain::Actor;

use crate::api::{ApiError, AppState};
use crate::repository::UserRecord;

/// The authenticated caller, resolved from the `Authorization: Bearer` header.
/// Inactive accounts are treated the same as missing ones.
pub struct AuthUser(pub UserRecord);

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.0.id,
            role: self.0.role,
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated.".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated.".to_string()))?;

        let user_id = state
            .tokens
            .verify(token)
            .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials.".to_string()))?;

        let user = state
            .users
            .find_by_id(user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials.".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Unauthorized(
                "Could not validate credentials.".to_string(),
            ));
        }

        Ok(AuthUser(user))
    }
}
