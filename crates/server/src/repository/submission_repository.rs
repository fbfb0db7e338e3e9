use crate::entity::{review, submission, submission_tag, tag, user};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reviewhub_core::domain::{SubmissionId, SubmissionStatus, TagId, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, FromQueryResult, JoinType, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub code_content: String,
    pub language: String,
    pub status: SubmissionStatus,
    pub walkthrough_video_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub code_content: String,
    pub language: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code_content: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub author_id: Option<UserId>,
    pub status: Option<SubmissionStatus>,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmissionListRow {
    pub id: SubmissionId,
    pub author_id: UserId,
    pub author_name: String,
    pub title: String,
    pub language: String,
    pub status: SubmissionStatus,
    pub created_at: NaiveDateTime,
    pub review_count: i64,
}

#[derive(Debug, Clone)]
pub struct SubmissionPage {
    pub rows: Vec<SubmissionListRow>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusCounts {
    pub pending: u64,
    pub in_review: u64,
    pub reviewed: u64,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Inserts the submission and its tag links (creating missing tags) in
    /// one transaction. Returns the record with the resolved tag names.
    async fn create(&self, new_submission: NewSubmission)
    -> Result<(SubmissionRecord, Vec<String>)>;
    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>>;
    async fn tags_for(&self, submission_id: SubmissionId) -> Result<Vec<String>>;
    async fn list(
        &self,
        filter: SubmissionFilter,
        skip: u64,
        limit: u64,
    ) -> Result<SubmissionPage>;
    /// Compare-and-swap update: only applies while the row is still pending.
    /// Returns `None` when zero rows matched, i.e. the status changed since
    /// the caller last looked.
    async fn update_pending(
        &self,
        submission_id: SubmissionId,
        update: SubmissionUpdate,
    ) -> Result<Option<SubmissionRecord>>;
    /// Compare-and-swap delete; `false` when the row was no longer pending.
    async fn delete_pending(&self, submission_id: SubmissionId) -> Result<bool>;
    async fn set_video_url(
        &self,
        submission_id: SubmissionId,
        video_url: Option<String>,
    ) -> Result<Option<SubmissionRecord>>;
    async fn status_counts(&self) -> Result<StatusCounts>;
}

pub(crate) fn status_code(status: SubmissionStatus) -> i16 {
    match status {
        SubmissionStatus::Pending => 0,
        SubmissionStatus::InReview => 1,
        SubmissionStatus::Reviewed => 2,
    }
}

pub(crate) fn status_from_code(code: i16) -> Result<SubmissionStatus> {
    match code {
        0 => Ok(SubmissionStatus::Pending),
        1 => Ok(SubmissionStatus::InReview),
        2 => Ok(SubmissionStatus::Reviewed),
        _ => Err(anyhow!("invalid submission.status code from database: {code}")),
    }
}

#[derive(Debug, FromQueryResult)]
struct ListRow {
    id: String,
    user_id: String,
    author_name: String,
    title: String,
    language: String,
    status: i16,
    created_at: NaiveDateTime,
    review_count: i64,
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: submission::Model) -> Result<SubmissionRecord> {
        let id = SubmissionId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid submission.id '{}' from database: {e}", model.id))?;
        let author_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid submission.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;

        Ok(SubmissionRecord {
            id,
            author_id,
            title: model.title,
            description: model.description,
            code_content: model.code_content,
            language: model.language,
            status: status_from_code(model.status)?,
            walkthrough_video_url: model.walkthrough_video_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn map_list_row(row: ListRow) -> Result<SubmissionListRow> {
        let id = SubmissionId::from_str(&row.id)
            .map_err(|e| anyhow!("invalid submission.id '{}' from database: {e}", row.id))?;
        let author_id = UserId::from_str(&row.user_id).map_err(|e| {
            anyhow!(
                "invalid submission.user_id '{}' from database: {e}",
                row.user_id
            )
        })?;

        Ok(SubmissionListRow {
            id,
            author_id,
            author_name: row.author_name,
            title: row.title,
            language: row.language,
            status: status_from_code(row.status)?,
            created_at: row.created_at,
            review_count: row.review_count,
        })
    }

    async fn link_tag(
        txn: &DatabaseTransaction,
        submission_id: &str,
        name: &str,
    ) -> Result<String, DbErr> {
        let existing = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(txn)
            .await?;

        let tag_model = match existing {
            Some(model) => model,
            None => {
                tag::ActiveModel {
                    id: Set(TagId::new().to_string()),
                    name: Set(name.to_string()),
                }
                .insert(txn)
                .await?
            }
        };

        submission_tag::ActiveModel {
            submission_id: Set(submission_id.to_string()),
            tag_id: Set(tag_model.id),
        }
        .insert(txn)
        .await?;

        Ok(tag_model.name)
    }

    fn apply_filter<E: EntityTrait>(
        query: sea_orm::Select<E>,
        filter: &SubmissionFilter,
    ) -> sea_orm::Select<E> {
        let mut query = query;
        if let Some(author_id) = filter.author_id {
            query = query.filter(submission::Column::UserId.eq(author_id.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.filter(submission::Column::Status.eq(status_code(status)));
        }
        if let Some(language) = &filter.language {
            query = query.filter(submission::Column::Language.eq(language.clone()));
        }
        query
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(
        &self,
        new_submission: NewSubmission,
    ) -> Result<(SubmissionRecord, Vec<String>)> {
        let id = SubmissionId::new();

        let mut tag_names: Vec<String> = Vec::with_capacity(new_submission.tags.len());
        for name in &new_submission.tags {
            let name = name.trim();
            if !name.is_empty() && !tag_names.iter().any(|seen| seen == name) {
                tag_names.push(name.to_string());
            }
        }

        let active_model = submission::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(new_submission.author_id.to_string()),
            title: Set(new_submission.title),
            description: Set(new_submission.description),
            code_content: Set(new_submission.code_content),
            language: Set(new_submission.language),
            status: Set(status_code(SubmissionStatus::Pending)),
            walkthrough_video_url: Set(None),
            ..Default::default()
        };

        let (model, linked) = self
            .db
            .transaction::<_, (submission::Model, Vec<String>), DbErr>(|txn| {
                Box::pin(async move {
                    let model = active_model.insert(txn).await?;

                    let mut linked = Vec::with_capacity(tag_names.len());
                    for name in &tag_names {
                        linked.push(Self::link_tag(txn, &model.id, name).await?);
                    }

                    Ok((model, linked))
                })
            })
            .await?;

        Ok((Self::map_model(model)?, linked))
    }

    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn tags_for(&self, submission_id: SubmissionId) -> Result<Vec<String>> {
        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let tags = model
            .find_related(tag::Entity)
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await?;

        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    async fn list(
        &self,
        filter: SubmissionFilter,
        skip: u64,
        limit: u64,
    ) -> Result<SubmissionPage> {
        let total = Self::apply_filter(submission::Entity::find(), &filter)
            .count(&self.db)
            .await?;

        let query = submission::Entity::find()
            .select_only()
            .column(submission::Column::Id)
            .column(submission::Column::UserId)
            .column(submission::Column::Title)
            .column(submission::Column::Language)
            .column(submission::Column::Status)
            .column(submission::Column::CreatedAt)
            .column_as(user::Column::Name, "author_name")
            .column_as(review::Column::Id.count(), "review_count")
            .join(JoinType::InnerJoin, submission::Relation::User.def())
            .join(JoinType::LeftJoin, submission::Relation::Review.def())
            .group_by(submission::Column::Id)
            .group_by(submission::Column::UserId)
            .group_by(submission::Column::Title)
            .group_by(submission::Column::Language)
            .group_by(submission::Column::Status)
            .group_by(submission::Column::CreatedAt)
            .group_by(user::Column::Name)
            .order_by_desc(submission::Column::CreatedAt)
            .order_by_asc(submission::Column::Id);

        let rows = Self::apply_filter(query, &filter)
            .offset(skip)
            .limit(limit)
            .into_model::<ListRow>()
            .all(&self.db)
            .await?;

        let rows = rows
            .into_iter()
            .map(Self::map_list_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(SubmissionPage { rows, total })
    }

    async fn update_pending(
        &self,
        submission_id: SubmissionId,
        update: SubmissionUpdate,
    ) -> Result<Option<SubmissionRecord>> {
        let mut query = submission::Entity::update_many()
            .col_expr(
                submission::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().naive_utc()),
            )
            .filter(submission::Column::Id.eq(submission_id.to_string()))
            .filter(submission::Column::Status.eq(status_code(SubmissionStatus::Pending)));

        if let Some(title) = update.title {
            query = query.col_expr(submission::Column::Title, Expr::value(title));
        }
        if let Some(description) = update.description {
            query = query.col_expr(submission::Column::Description, Expr::value(description));
        }
        if let Some(code_content) = update.code_content {
            query = query.col_expr(submission::Column::CodeContent, Expr::value(code_content));
        }
        if let Some(language) = update.language {
            query = query.col_expr(submission::Column::Language, Expr::value(language));
        }

        let result = query.exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(submission_id).await
    }

    async fn delete_pending(&self, submission_id: SubmissionId) -> Result<bool> {
        let result = submission::Entity::delete_many()
            .filter(submission::Column::Id.eq(submission_id.to_string()))
            .filter(submission::Column::Status.eq(status_code(SubmissionStatus::Pending)))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn set_video_url(
        &self,
        submission_id: SubmissionId,
        video_url: Option<String>,
    ) -> Result<Option<SubmissionRecord>> {
        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: submission::ActiveModel = model.into();
        active_model.walkthrough_video_url = Set(video_url);
        active_model.updated_at = Set(chrono::Utc::now().naive_utc());

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated).map(Some)
    }

    async fn status_counts(&self) -> Result<StatusCounts> {
        let count_for = |status: SubmissionStatus| {
            submission::Entity::find()
                .filter(submission::Column::Status.eq(status_code(status)))
                .count(&self.db)
        };

        Ok(StatusCounts {
            pending: count_for(SubmissionStatus::Pending).await?,
            in_review: count_for(SubmissionStatus::InReview).await?,
            reviewed: count_for(SubmissionStatus::Reviewed).await?,
        })
    }
}
