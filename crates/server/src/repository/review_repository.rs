use crate::entity::{annotation, notification, review, submission, user};
use crate::repository::submission_repository::status_code;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reviewhub_core::domain::{
    AnnotationId, NotificationId, Rating, ReviewId, SubmissionId, SubmissionStatus, UserId,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ReviewerInfo {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub line_number: i32,
    pub comment_text: String,
}

#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub submission_id: SubmissionId,
    pub reviewer: ReviewerInfo,
    pub overall_comment: String,
    pub rating: Rating,
    pub created_at: NaiveDateTime,
    pub annotations: Vec<AnnotationRecord>,
}

#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub line_number: i32,
    pub comment_text: String,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub submission_id: SubmissionId,
    pub reviewer_id: UserId,
    pub overall_comment: String,
    pub rating: Rating,
    pub annotations: Vec<NewAnnotation>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: UserId,
    pub message: String,
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persists the review, its annotations, the submission's transition to
    /// `reviewed`, and the author notification as one transaction. A failure
    /// anywhere rolls back everything.
    async fn create_with_annotations(
        &self,
        new_review: NewReview,
        notify: NewNotification,
    ) -> Result<ReviewRecord>;
    async fn list_for_submission(&self, submission_id: SubmissionId) -> Result<Vec<ReviewRecord>>;
    async fn count(&self) -> Result<u64>;
}

#[derive(Clone)]
pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_models(
        review: review::Model,
        reviewer: user::Model,
        annotations: Vec<annotation::Model>,
    ) -> Result<ReviewRecord> {
        let id = ReviewId::from_str(&review.id)
            .map_err(|e| anyhow!("invalid review.id '{}' from database: {e}", review.id))?;
        let submission_id = SubmissionId::from_str(&review.submission_id).map_err(|e| {
            anyhow!(
                "invalid review.submission_id '{}' from database: {e}",
                review.submission_id
            )
        })?;
        let reviewer_id = UserId::from_str(&reviewer.id)
            .map_err(|e| anyhow!("invalid user.id '{}' from database: {e}", reviewer.id))?;

        let annotations = annotations
            .into_iter()
            .map(|model| {
                let id = AnnotationId::from_str(&model.id).map_err(|e| {
                    anyhow!("invalid annotation.id '{}' from database: {e}", model.id)
                })?;
                Ok(AnnotationRecord {
                    id,
                    line_number: model.line_number,
                    comment_text: model.comment_text,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ReviewRecord {
            id,
            submission_id,
            reviewer: ReviewerInfo {
                id: reviewer_id,
                name: reviewer.name,
            },
            overall_comment: review.overall_comment,
            rating: Rating::new(review.rating)
                .map_err(|e| anyhow!("invalid review.rating from database: {e}"))?,
            created_at: review.created_at,
            annotations,
        })
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn create_with_annotations(
        &self,
        new_review: NewReview,
        notify: NewNotification,
    ) -> Result<ReviewRecord> {
        let review_id = ReviewId::new();

        let (review_model, reviewer_model, annotation_models) = self
            .db
            .transaction::<_, (review::Model, user::Model, Vec<annotation::Model>), DbErr>(
                |txn| {
                    Box::pin(async move {
                        let reviewer = user::Entity::find_by_id(new_review.reviewer_id.to_string())
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                DbErr::Custom(format!(
                                    "reviewer {} not found",
                                    new_review.reviewer_id
                                ))
                            })?;

                        let review_model = review::ActiveModel {
                            id: Set(review_id.to_string()),
                            submission_id: Set(new_review.submission_id.to_string()),
                            reviewer_id: Set(new_review.reviewer_id.to_string()),
                            overall_comment: Set(new_review.overall_comment),
                            rating: Set(new_review.rating.value()),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;

                        let mut annotation_models = Vec::with_capacity(new_review.annotations.len());
                        for ann in new_review.annotations {
                            let model = annotation::ActiveModel {
                                id: Set(AnnotationId::new().to_string()),
                                review_id: Set(review_model.id.clone()),
                                line_number: Set(ann.line_number),
                                comment_text: Set(ann.comment_text),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?;
                            annotation_models.push(model);
                        }

                        submission::Entity::update_many()
                            .col_expr(
                                submission::Column::Status,
                                Expr::value(status_code(SubmissionStatus::Reviewed)),
                            )
                            .col_expr(
                                submission::Column::UpdatedAt,
                                Expr::value(chrono::Utc::now().naive_utc()),
                            )
                            .filter(
                                submission::Column::Id.eq(new_review.submission_id.to_string()),
                            )
                            .exec(txn)
                            .await?;

                        notification::ActiveModel {
                            id: Set(NotificationId::new().to_string()),
                            user_id: Set(notify.user_id.to_string()),
                            message: Set(notify.message),
                            is_read: Set(false),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;

                        Ok((review_model, reviewer, annotation_models))
                    })
                },
            )
            .await?;

        Self::map_models(review_model, reviewer_model, annotation_models)
    }

    async fn list_for_submission(&self, submission_id: SubmissionId) -> Result<Vec<ReviewRecord>> {
        let rows = review::Entity::find()
            .filter(review::Column::SubmissionId.eq(submission_id.to_string()))
            .order_by_asc(review::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await?;

        let review_models: Vec<review::Model> =
            rows.iter().map(|(review, _)| review.clone()).collect();
        let annotations = review_models
            .load_many(annotation::Entity, &self.db)
            .await?;

        rows.into_iter()
            .zip(annotations)
            .map(|((review, reviewer), annotations)| {
                let reviewer = reviewer.ok_or_else(|| {
                    anyhow!("review {} has no reviewer row", review.id)
                })?;
                Self::map_models(review, reviewer, annotations)
            })
            .collect()
    }

    async fn count(&self) -> Result<u64> {
        let count = review::Entity::find().count(&self.db).await?;
        Ok(count)
    }
}
