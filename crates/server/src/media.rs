//! 视频存储客户端。
//!
//! 将提交的讲解视频转发到外部媒体服务，通过 HTTP API 上传与删除。

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::MediaConfig;
use reviewhub_core::domain::{SubmissionId, UserId};

/// 单个视频的最大字节数（100 MiB）。
pub const MAX_VIDEO_BYTES: usize = 100 * 1024 * 1024;

/// 允许上传的视频 MIME 类型。
pub const ALLOWED_VIDEO_TYPES: [&str; 4] = [
    "video/webm",
    "video/mp4",
    "video/quicktime",
    "video/x-matroska",
];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid file type. Allowed: video/webm, video/mp4, video/quicktime, video/x-matroska")]
    UnsupportedType(String),

    #[error("File too large. Maximum size is 100MB")]
    TooLarge(usize),

    #[error("media service request failed: {0}")]
    Upstream(String),
}

/// 上传前的本地校验，与媒体服务无关。
pub fn validate_video(content_type: &str, size: usize) -> Result<(), MediaError> {
    if !ALLOWED_VIDEO_TYPES.contains(&content_type) {
        return Err(MediaError::UnsupportedType(content_type.to_string()));
    }
    if size > MAX_VIDEO_BYTES {
        return Err(MediaError::TooLarge(size));
    }
    Ok(())
}

/// 派生确定性的资源标识，重复上传会覆盖旧资源。
pub fn video_public_id(folder: &str, submission_id: SubmissionId, user_id: UserId) -> String {
    format!("{folder}/submission_{submission_id}_user_{user_id}")
}

#[async_trait]
pub trait VideoStorage: Send + Sync {
    /// 上传视频，返回持久化 URL。
    async fn upload(
        &self,
        public_id: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError>;

    /// 按标识删除远端资源。
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

/// 通过 HTTP API 与媒体服务交互的客户端。
pub struct HttpVideoStorage {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpVideoStorage {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn asset_url(&self, public_id: &str) -> String {
        format!("{}/videos/{}", self.base_url, public_id)
    }
}

#[async_trait]
impl VideoStorage for HttpVideoStorage {
    async fn upload(
        &self,
        public_id: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("walkthrough")
            .mime_str(content_type)
            .map_err(|e| MediaError::Upstream(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("overwrite", "true")
            .part("file", part);

        let response = self
            .client
            .post(self.asset_url(public_id))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Upstream(format!(
                "upload returned status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upstream(e.to_string()))?;

        info!(public_id, url = %body.url, "video uploaded");
        Ok(body.url)
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(self.asset_url(public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| MediaError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Upstream(format!(
                "delete returned status {}",
                response.status()
            )));
        }

        info!(public_id, "video deleted");
        Ok(())
    }
}
