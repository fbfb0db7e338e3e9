//! 提交 API 路由：创建、列表、详情、更新、删除。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::Multipart;
use axum::extract::{DefaultBodyLimit, FromRequest, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use axum::{Json, Router};
use reviewhub_api_types::{
    AuthorInfo, CreateSubmissionRequest, CreateSubmissionResponse, SubmissionDetail,
    SubmissionListResponse, SubmissionSummary, UpdateSubmissionRequest, UpdateSubmissionResponse,
};
use reviewhub_core::domain::{Action, Role, SubmissionId, SubmissionRef, SubmissionStatus, decide};
use serde::Deserialize;
use tracing::warn;

use super::error::ApiError;
use super::reviews::review_out;
use super::state::AppState;
use crate::auth::AuthUser;
use crate::media::{validate_video, video_public_id};
use crate::repository::{NewSubmission, SubmissionFilter, SubmissionRecord, SubmissionUpdate};

/// 创建提交路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/submissions",
            get(list_submissions).post(create_submission),
        )
        .route(
            "/api/submissions/{id}",
            get(get_submission)
                .put(update_submission)
                .delete(delete_submission),
        )
        .layer(DefaultBodyLimit::max(super::UPLOAD_BODY_LIMIT_BYTES))
}

pub(super) fn parse_submission_id(raw: &str) -> Result<SubmissionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("invalid submission id: {raw}")))
}

pub(super) async fn resolve_submission(
    state: &AppState,
    submission_id: SubmissionId,
) -> Result<SubmissionRecord, ApiError> {
    state
        .submissions
        .find_by_id(submission_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))
}

pub(super) fn submission_ref(record: &SubmissionRecord) -> SubmissionRef {
    SubmissionRef {
        author_id: record.author_id,
        status: record.status,
    }
}

/// 创建提交。JSON 请求体，或携带可选 `video` 文件的 multipart 表单。
async fn create_submission(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    request: Request,
) -> Result<(StatusCode, Json<CreateSubmissionResponse>), ApiError> {
    decide(&user.actor(), Action::CreateSubmission)?;

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let (payload, video) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        parse_multipart_submission(multipart).await?
    } else {
        let Json(payload) = Json::<CreateSubmissionRequest>::from_request(request, &state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        (payload, None)
    };

    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    if payload.language.trim().is_empty() {
        return Err(ApiError::Validation("language is required".to_string()));
    }
    if payload.code_content.is_empty() {
        return Err(ApiError::Validation("code_content is required".to_string()));
    }

    // Reject a bad video before anything is written.
    if let Some((video_type, bytes)) = &video {
        validate_video(video_type, bytes.len())?;
    }

    let (record, tags) = state
        .submissions
        .create(NewSubmission {
            author_id: user.0.id,
            title: payload.title.trim().to_string(),
            description: payload.description,
            code_content: payload.code_content,
            language: payload.language.trim().to_string(),
            tags: payload.tags,
        })
        .await
        .map_err(ApiError::Internal)?;

    // Upload failure here is logged and swallowed: the submission itself
    // already succeeded. The dedicated upload endpoint propagates instead.
    let mut video_url = None;
    if let Some((video_type, bytes)) = video {
        let public_id = video_public_id(&state.upload_folder, record.id, user.0.id);
        match state
            .media
            .upload(&public_id, &video_type, bytes.to_vec())
            .await
        {
            Ok(url) => {
                state
                    .submissions
                    .set_video_url(record.id, Some(url.clone()))
                    .await
                    .map_err(ApiError::Internal)?;
                video_url = Some(url);
            }
            Err(err) => {
                warn!(
                    submission_id = %record.id,
                    error = %err,
                    "walkthrough video upload failed, keeping submission"
                );
            }
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            id: record.id.to_string(),
            user_id: record.author_id.to_string(),
            title: record.title,
            description: record.description,
            code_content: record.code_content,
            language: record.language,
            status: record.status.to_string(),
            tags,
            walkthrough_video_url: video_url,
            created_at: record.created_at,
        }),
    ))
}

async fn parse_multipart_submission(
    mut multipart: Multipart,
) -> Result<(CreateSubmissionRequest, Option<(String, Bytes)>), ApiError> {
    let mut title = None;
    let mut description = None;
    let mut code_content = None;
    let mut language = None;
    let mut tags = Vec::new();
    let mut video = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "title" => title = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            "code_content" => code_content = Some(read_text(field).await?),
            "language" => language = Some(read_text(field).await?),
            "tags" => {
                let raw = read_text(field).await?;
                tags = serde_json::from_str(&raw).map_err(|_| {
                    ApiError::Validation("tags must be a JSON array of strings".to_string())
                })?;
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

    let payload = CreateSubmissionRequest {
        title: title.ok_or_else(|| ApiError::Validation("title is required".to_string()))?,
        description: description
            .ok_or_else(|| ApiError::Validation("description is required".to_string()))?,
        code_content: code_content
            .ok_or_else(|| ApiError::Validation("code_content is required".to_string()))?,
        language: language
            .ok_or_else(|| ApiError::Validation("language is required".to_string()))?,
        tags,
    };

    Ok((payload, video))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))
}

/// 列表查询参数。
#[derive(Debug, Deserialize)]
struct ListSubmissionsQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    status: Option<String>,
    language: Option<String>,
}

fn default_limit() -> u64 {
    10
}

/// 分页的提交列表，按角色过滤与投影。
async fn list_submissions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<SubmissionListResponse>, ApiError> {
    let limit = query.limit.clamp(1, 100);
    let skip = query.skip;

    let status = query
        .status
        .as_deref()
        .map(str::parse::<SubmissionStatus>)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let filter = SubmissionFilter {
        author_id: (user.0.role == Role::Student).then_some(user.0.id),
        status,
        language: query.language,
    };

    let page = state
        .submissions
        .list(filter, skip, limit)
        .await
        .map_err(ApiError::Internal)?;

    let is_student = user.0.role == Role::Student;
    let submissions: Vec<SubmissionSummary> = page
        .rows
        .into_iter()
        .map(|row| SubmissionSummary {
            id: row.id.to_string(),
            user: (!is_student).then(|| AuthorInfo {
                id: row.author_id.to_string(),
                name: row.author_name,
            }),
            title: row.title,
            language: row.language,
            status: row.status.to_string(),
            created_at: row.created_at,
            review_count: row.review_count,
        })
        .collect();

    let showing = submissions.len() as u64;

    Ok(Json(SubmissionListResponse {
        submissions,
        total: page.total,
        page: skip / limit + 1,
        pages: page.total.div_ceil(limit),
        showing,
    }))
}

/// 提交详情，含作者、标签与全部评审。
async fn get_submission(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SubmissionDetail>, ApiError> {
    let submission_id = parse_submission_id(&id)?;
    let record = resolve_submission(&state, submission_id).await?;

    decide(&user.actor(), Action::ViewSubmission(&submission_ref(&record)))?;

    let author = state
        .users
        .find_by_id(record.author_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!(
                "submission {} has no author row",
                record.id
            ))
        })?;

    let tags = state
        .submissions
        .tags_for(submission_id)
        .await
        .map_err(ApiError::Internal)?;

    let reviews = state
        .reviews
        .list_for_submission(submission_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(SubmissionDetail {
        id: record.id.to_string(),
        user: AuthorInfo {
            id: author.id.to_string(),
            name: author.name,
        },
        title: record.title,
        description: record.description,
        code_content: record.code_content,
        language: record.language,
        status: record.status.to_string(),
        tags,
        walkthrough_video_url: record.walkthrough_video_url,
        created_at: record.created_at,
        updated_at: record.updated_at,
        reviews: reviews.into_iter().map(review_out).collect(),
    }))
}

/// 部分更新，仅限 pending 状态的本人提交。
async fn update_submission(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubmissionRequest>,
) -> Result<Json<UpdateSubmissionResponse>, ApiError> {
    let submission_id = parse_submission_id(&id)?;
    let record = resolve_submission(&state, submission_id).await?;

    decide(
        &user.actor(),
        Action::UpdateSubmission(&submission_ref(&record)),
    )?;

    let update = SubmissionUpdate {
        title: payload.title,
        description: payload.description,
        code_content: payload.code_content,
        language: payload.language,
    };

    // The policy already passed, so a missed compare-and-swap means the
    // status moved concurrently.
    let updated = state
        .submissions
        .update_pending(submission_id, update)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            ApiError::InvalidState("Only pending submissions can be updated.".to_string())
        })?;

    Ok(Json(UpdateSubmissionResponse {
        id: updated.id.to_string(),
        title: updated.title,
        status: updated.status.to_string(),
        updated_at: updated.updated_at,
    }))
}

/// 删除，仅限 pending 状态的本人提交。
async fn delete_submission(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let submission_id = parse_submission_id(&id)?;
    let record = resolve_submission(&state, submission_id).await?;

    decide(
        &user.actor(),
        Action::DeleteSubmission(&submission_ref(&record)),
    )?;

    let deleted = state
        .submissions
        .delete_pending(submission_id)
        .await
        .map_err(ApiError::Internal)?;
    if !deleted {
        return Err(ApiError::InvalidState(
            "Only pending submissions can be deleted.".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
