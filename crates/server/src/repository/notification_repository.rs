use crate::entity::notification;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reviewhub_core::domain::{NotificationId, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<NotificationRecord>>;
    /// Marks the notification read, scoped to its owner. Returns `None` when
    /// no notification with that id belongs to the user.
    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<Option<NotificationRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmNotificationRepository {
    db: DatabaseConnection,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: notification::Model) -> Result<NotificationRecord> {
        let id = NotificationId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid notification.id '{}' from database: {e}", model.id))?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid notification.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;

        Ok(NotificationRecord {
            id,
            user_id,
            message: model.message,
            is_read: model.is_read,
            created_at: model.created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<NotificationRecord>> {
        let models = notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<Option<NotificationRecord>> {
        let model = notification::Entity::find_by_id(notification_id.to_string())
            .filter(notification::Column::UserId.eq(user_id.to_string()))
            .one(&self.db)
            .await?;

        let Some(model) = model else {
            return Ok(None);
        };

        let mut active_model: notification::ActiveModel = model.into();
        active_model.is_read = Set(true);

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated).map(Some)
    }
}
