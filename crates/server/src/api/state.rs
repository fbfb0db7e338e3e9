//! 统一的应用状态。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::TokenService;
use crate::media::VideoStorage;
use crate::repository::{
    NotificationRepository, ReviewRepository, SeaOrmNotificationRepository, SeaOrmReviewRepository,
    SeaOrmSubmissionRepository, SeaOrmTagRepository, SeaOrmUserRepository, SubmissionRepository,
    TagRepository, UserRepository,
};

/// 统一的应用状态，包含所有 handler 共享的依赖。
#[derive(Clone)]
pub struct AppState {
    /// 数据库连接（健康检查用）。
    pub db: DatabaseConnection,
    pub users: Arc<dyn UserRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    /// 访问令牌的签发与校验。
    pub tokens: TokenService,
    /// 视频存储客户端。
    pub media: Arc<dyn VideoStorage>,
    /// 媒体服务上的视频目录。
    pub upload_folder: String,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(
        db: DatabaseConnection,
        tokens: TokenService,
        media: Arc<dyn VideoStorage>,
        upload_folder: String,
    ) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            submissions: Arc::new(SeaOrmSubmissionRepository::new(db.clone())),
            reviews: Arc::new(SeaOrmReviewRepository::new(db.clone())),
            tags: Arc::new(SeaOrmTagRepository::new(db.clone())),
            notifications: Arc::new(SeaOrmNotificationRepository::new(db.clone())),
            db,
            tokens,
            media,
            upload_folder,
        }
    }
}
