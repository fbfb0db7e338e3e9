//! 标签 API 路由。

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use reviewhub_api_types::TagOut;

use super::error::ApiError;
use super::state::AppState;
use crate::auth::AuthUser;

/// 创建标签路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/tags", get(list_tags))
}

/// 列出全部标签，按名称排序。
async fn list_tags(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<TagOut>>, ApiError> {
    let tags = state.tags.list().await.map_err(ApiError::Internal)?;

    Ok(Json(
        tags.into_iter()
            .map(|tag| TagOut {
                id: tag.id.to_string(),
                name: tag.name,
            })
            .collect(),
    ))
}
