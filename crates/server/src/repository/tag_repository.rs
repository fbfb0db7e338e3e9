use crate::entity::tag;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reviewhub_core::domain::TagId;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct TagRecord {
    pub id: TagId,
    pub name: String,
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<TagRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmTagRepository {
    db: DatabaseConnection,
}

impl SeaOrmTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: tag::Model) -> Result<TagRecord> {
        let id = TagId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid tag.id '{}' from database: {e}", model.id))?;

        Ok(TagRecord {
            id,
            name: model.name,
        })
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn list(&self) -> Result<Vec<TagRecord>> {
        let models = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
