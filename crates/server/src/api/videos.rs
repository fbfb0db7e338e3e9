//! 讲解视频 API 路由：独立上传与删除。
//!
//! 与嵌入创建提交的上传不同，这里的媒体服务故障会作为错误返回给调用方。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::Multipart;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::routing::{delete, post};
use axum::{Json, Router};
use reviewhub_api_types::{MessageResponse, VideoUploadResponse};
use reviewhub_core::domain::{Action, decide};
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use super::submissions::{parse_submission_id, resolve_submission, submission_ref};
use crate::auth::AuthUser;
use crate::media::{validate_video, video_public_id};

/// 创建视频路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/submissions/upload-video", post(upload_video))
        .route("/api/submissions/{id}/video", delete(delete_video))
        .layer(DefaultBodyLimit::max(super::UPLOAD_BODY_LIMIT_BYTES))
}

/// 为本人提交上传讲解视频，重复上传覆盖旧视频。
async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<VideoUploadResponse>, ApiError> {
    let mut submission_id_raw = None;
    let mut video: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "submission_id" => {
                submission_id_raw = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            "video" => {
                let video_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                video = Some((video_type, bytes));
            }
            _ => {}
        }
    }

    let submission_id_raw = submission_id_raw
        .ok_or_else(|| ApiError::Validation("submission_id is required".to_string()))?;
    let (video_type, bytes) =
        video.ok_or_else(|| ApiError::Validation("video file is required".to_string()))?;

    let submission_id = parse_submission_id(&submission_id_raw)?;
    let submission = resolve_submission(&state, submission_id).await?;

    decide(
        &user.actor(),
        Action::AttachVideo(&submission_ref(&submission)),
    )?;

    validate_video(&video_type, bytes.len())?;

    info!(
        submission_id = %submission_id,
        user_id = %user.0.id,
        size = bytes.len(),
        "uploading walkthrough video"
    );

    let public_id = video_public_id(&state.upload_folder, submission_id, user.0.id);
    let video_url = state
        .media
        .upload(&public_id, &video_type, bytes.to_vec())
        .await?;

    state
        .submissions
        .set_video_url(submission_id, Some(video_url.clone()))
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(VideoUploadResponse {
        message: "Video uploaded successfully".to_string(),
        video_url,
        submission_id: submission_id.to_string(),
    }))
}

/// 删除本人提交的讲解视频，同时移除远端资源。
async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let submission_id = parse_submission_id(&id)?;
    let submission = resolve_submission(&state, submission_id).await?;

    decide(
        &user.actor(),
        Action::RemoveVideo(&submission_ref(&submission)),
    )?;

    if submission.walkthrough_video_url.is_none() {
        return Err(ApiError::NotFound(
            "No video found for this submission".to_string(),
        ));
    }

    let public_id = video_public_id(&state.upload_folder, submission_id, user.0.id);
    state.media.delete(&public_id).await?;

    state
        .submissions
        .set_video_url(submission_id, None)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(MessageResponse {
        message: "Video deleted successfully".to_string(),
    }))
}
