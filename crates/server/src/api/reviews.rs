//! 评审 API 路由：创建评审（含行内批注）、按提交列出评审。

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use reviewhub_api_types::{
    AnnotationOut, AuthorInfo, CreateReviewRequest, ReviewListResponse, ReviewOut,
};
use reviewhub_core::domain::{Action, Rating, decide};

use super::error::ApiError;
use super::state::AppState;
use super::submissions::{parse_submission_id, resolve_submission, submission_ref};
use crate::auth::AuthUser;
use crate::repository::{NewAnnotation, NewNotification, NewReview, ReviewRecord};

/// 创建评审路由。
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route(
            "/api/reviews/submission/{id}",
            get(list_reviews_for_submission),
        )
}

pub(super) fn review_out(record: ReviewRecord) -> ReviewOut {
    ReviewOut {
        id: record.id.to_string(),
        submission_id: record.submission_id.to_string(),
        reviewer: AuthorInfo {
            id: record.reviewer.id.to_string(),
            name: record.reviewer.name,
        },
        overall_comment: record.overall_comment,
        rating: record.rating.value(),
        created_at: record.created_at,
        annotations: record
            .annotations
            .into_iter()
            .map(|annotation| AnnotationOut {
                id: annotation.id.to_string(),
                line_number: annotation.line_number,
                comment_text: annotation.comment_text,
            })
            .collect(),
    }
}

/// 创建评审及其批注，并将提交置为 reviewed。
async fn create_review(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewOut>), ApiError> {
    decide(&user.actor(), Action::CreateReview)?;

    let rating = Rating::new(payload.rating).map_err(|e| ApiError::Validation(e.to_string()))?;

    let submission_id = parse_submission_id(&payload.submission_id)?;
    let submission = state
        .submissions
        .find_by_id(submission_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Submission with id {} not found",
                payload.submission_id
            ))
        })?;

    let new_review = NewReview {
        submission_id,
        reviewer_id: user.0.id,
        overall_comment: payload.overall_comment,
        rating,
        annotations: payload
            .annotations
            .into_iter()
            .map(|annotation| NewAnnotation {
                line_number: annotation.line_number,
                comment_text: annotation.comment_text,
            })
            .collect(),
    };
    let notify = NewNotification {
        user_id: submission.author_id,
        message: format!(
            "Your submission \"{}\" has been reviewed.",
            submission.title
        ),
    };

    let record = state
        .reviews
        .create_with_annotations(new_review, notify)
        .await
        .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(review_out(record))))
}

/// 列出指定提交的全部评审。
async fn list_reviews_for_submission(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let submission_id = parse_submission_id(&id)?;
    let submission = resolve_submission(&state, submission_id).await?;

    decide(
        &user.actor(),
        Action::ViewReviews(&submission_ref(&submission)),
    )?;

    let reviews = state
        .reviews
        .list_for_submission(submission_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(ReviewListResponse {
        submission_id: submission_id.to_string(),
        reviews: reviews.into_iter().map(review_out).collect(),
    }))
}
