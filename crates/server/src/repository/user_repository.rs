use crate::entity::user;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reviewhub_core::domain::{Role, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord>;
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
    async fn count(&self) -> Result<u64>;
}

pub(crate) fn role_code(role: Role) -> i16 {
    match role {
        Role::Student => 0,
        Role::Mentor => 1,
        Role::Admin => 2,
    }
}

pub(crate) fn role_from_code(code: i16) -> Result<Role> {
    match code {
        0 => Ok(Role::Student),
        1 => Ok(Role::Mentor),
        2 => Ok(Role::Admin),
        _ => Err(anyhow!("invalid user.role code from database: {code}")),
    }
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: user::Model) -> Result<UserRecord> {
        let id = UserId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid user.id '{}' from database: {e}", model.id))?;

        Ok(UserRecord {
            id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            role: role_from_code(model.role)?,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let id = UserId::new();

        let active_model = user::ActiveModel {
            id: Set(id.to_string()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(role_code(new_user.role)),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let model = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn count(&self) -> Result<u64> {
        let count = user::Entity::find().count(&self.db).await?;
        Ok(count)
    }
}
