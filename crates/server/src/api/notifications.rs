//! 通知 API 路由。

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use reviewhub_api_types::NotificationOut;
use reviewhub_core::domain::NotificationId;

use super::error::ApiError;
use super::state::AppState;
use crate::auth::AuthUser;
use crate::repository::NotificationRecord;

/// 创建通知路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/{id}/read", put(mark_notification_read))
}

fn notification_out(record: NotificationRecord) -> NotificationOut {
    NotificationOut {
        id: record.id.to_string(),
        message: record.message,
        is_read: record.is_read,
        created_at: record.created_at,
    }
}

/// 列出当前用户的通知，新的在前。
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<NotificationOut>>, ApiError> {
    let notifications = state
        .notifications
        .list_for_user(user.0.id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(
        notifications.into_iter().map(notification_out).collect(),
    ))
}

/// 将一条通知标记为已读，仅限本人。
async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<NotificationOut>, ApiError> {
    let notification_id: NotificationId = id
        .parse()
        .map_err(|_| ApiError::Validation(format!("invalid notification id: {id}")))?;

    let record = state
        .notifications
        .mark_read(notification_id, user.0.id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification_out(record)))
}
