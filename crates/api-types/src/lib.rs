//! Shared request/response types used by API-facing crates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            database: "connected".to_string(),
        }
    }

    #[must_use]
    pub fn degraded() -> Self {
        Self {
            status: "error".to_string(),
            database: "disconnected".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Authentication

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "student".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Submissions

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubmissionRequest {
    pub title: String,
    pub description: String,
    pub code_content: String,
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code_content: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubmissionResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub code_content: String,
    pub language: String,
    pub status: String,
    pub tags: Vec<String>,
    pub walkthrough_video_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// One row of the paginated submission listing. `user` is omitted for
/// students, who only ever see their own submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthorInfo>,
    pub title: String,
    pub language: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionSummary>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub showing: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDetail {
    pub id: String,
    pub user: AuthorInfo,
    pub title: String,
    pub description: String,
    pub code_content: String,
    pub language: String,
    pub status: String,
    pub tags: Vec<String>,
    pub walkthrough_video_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub reviews: Vec<ReviewOut>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubmissionResponse {
    pub id: String,
    pub title: String,
    pub status: String,
    pub updated_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Reviews

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAnnotationRequest {
    pub line_number: i32,
    pub comment_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub submission_id: String,
    pub overall_comment: String,
    pub rating: i32,
    #[serde(default)]
    pub annotations: Vec<CreateAnnotationRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationOut {
    pub id: String,
    pub line_number: i32,
    pub comment_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOut {
    pub id: String,
    pub submission_id: String,
    pub reviewer: AuthorInfo,
    pub overall_comment: String,
    pub rating: i32,
    pub created_at: NaiveDateTime,
    pub annotations: Vec<AnnotationOut>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub submission_id: String,
    pub reviews: Vec<ReviewOut>,
}

// ---------------------------------------------------------------------------
// Videos

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    pub message: String,
    pub video_url: String,
    pub submission_id: String,
}

// ---------------------------------------------------------------------------
// Tags, notifications, analytics

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOut {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOut {
    pub id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_users: u64,
    pub total_submissions: u64,
    pub pending_submissions: u64,
    pub in_review_submissions: u64,
    pub reviewed_submissions: u64,
    pub total_reviews: u64,
}
