//! API 路由模块。
//!
//! 将各资源的子路由组装为完整的应用路由。

pub mod analytics;
pub mod auth;
pub mod error;
pub mod notifications;
pub mod reviews;
pub mod state;
pub mod submissions;
pub mod tags;
pub mod videos;

pub use error::ApiError;
pub use state::AppState;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use reviewhub_api_types::{HealthCheckResponse, MessageResponse};
use tower_http::cors::CorsLayer;
use tracing::warn;

/// 请求体大小上限。必须大于视频校验上限，超限校验才能返回 400 而不是 413。
pub(crate) const UPLOAD_BODY_LIMIT_BYTES: usize = 256 * 1024 * 1024;

/// 创建完整的应用路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth::router())
        .merge(submissions::router())
        .merge(reviews::router())
        .merge(videos::router())
        .merge(tags::router())
        .merge(notifications::router())
        .merge(analytics::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Code Review System!".to_string(),
    })
}

/// 数据库连通性探测。
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    match state.db.ping().await {
        Ok(()) => Json(HealthCheckResponse::ok()),
        Err(err) => {
            warn!(error = %err, "database ping failed");
            Json(HealthCheckResponse::degraded())
        }
    }
}
