//! 统计 API 路由，面向导师与管理员。

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use reviewhub_api_types::AnalyticsSummary;
use reviewhub_core::domain::{Action, decide};

use super::error::ApiError;
use super::state::AppState;
use crate::auth::AuthUser;

/// 创建统计路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/analytics/summary", get(summary))
}

/// 平台级统计汇总。
async fn summary(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    decide(&user.actor(), Action::ViewAnalytics)?;

    let total_users = state.users.count().await.map_err(ApiError::Internal)?;
    let status_counts = state
        .submissions
        .status_counts()
        .await
        .map_err(ApiError::Internal)?;
    let total_reviews = state.reviews.count().await.map_err(ApiError::Internal)?;

    Ok(Json(AnalyticsSummary {
        total_users,
        total_submissions: status_counts.pending
            + status_counts.in_review
            + status_counts.reviewed,
        pending_submissions: status_counts.pending,
        in_review_submissions: status_counts.in_review,
        reviewed_submissions: status_counts.reviewed,
        total_reviews,
    }))
}
