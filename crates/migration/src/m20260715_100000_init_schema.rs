use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 36).primary_key())
                    .col(string_len(User::Name, 100))
                    .col(string_len(User::Email, 255).unique_key())
                    .col(string_len(User::PasswordHash, 255))
                    // Role enum is represented in app code. DB stores compact numeric code.
                    // 0=student, 1=mentor, 2=admin
                    .col(
                        small_integer(User::Role)
                            .check(Expr::col(User::Role).gte(0))
                            .check(Expr::col(User::Role).lte(2)),
                    )
                    .col(boolean(User::IsActive).default(true))
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(User::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(string_len(Submission::Id, 36).primary_key())
                    .col(string_len(Submission::UserId, 36))
                    .col(string_len(Submission::Title, 200))
                    .col(text(Submission::Description))
                    .col(text(Submission::CodeContent))
                    .col(string_len(Submission::Language, 50))
                    // SubmissionStatus enum is represented in app code.
                    // 0=pending, 1=in_review, 2=reviewed
                    .col(
                        small_integer(Submission::Status)
                            .default(0)
                            .check(Expr::col(Submission::Status).gte(0))
                            .check(Expr::col(Submission::Status).lte(2)),
                    )
                    .col(string_null(Submission::WalkthroughVideoUrl))
                    .col(timestamp(Submission::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Submission::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submissions-user_id")
                            .from(Submission::Table, Submission::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(string_len(Tag::Id, 36).primary_key())
                    .col(string_len(Tag::Name, 100).unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubmissionTag::Table)
                    .if_not_exists()
                    .col(string_len(SubmissionTag::SubmissionId, 36))
                    .col(string_len(SubmissionTag::TagId, 36))
                    .primary_key(
                        Index::create()
                            .col(SubmissionTag::SubmissionId)
                            .col(SubmissionTag::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission_tags-submission_id")
                            .from(SubmissionTag::Table, SubmissionTag::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission_tags-tag_id")
                            .from(SubmissionTag::Table, SubmissionTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(string_len(Review::Id, 36).primary_key())
                    .col(string_len(Review::SubmissionId, 36))
                    .col(string_len(Review::ReviewerId, 36))
                    .col(text(Review::OverallComment))
                    .col(
                        integer(Review::Rating)
                            .check(Expr::col(Review::Rating).gte(1))
                            .check(Expr::col(Review::Rating).lte(5)),
                    )
                    .col(timestamp(Review::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Review::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reviews-submission_id")
                            .from(Review::Table, Review::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reviews-reviewer_id")
                            .from(Review::Table, Review::ReviewerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Annotation::Table)
                    .if_not_exists()
                    .col(string_len(Annotation::Id, 36).primary_key())
                    .col(string_len(Annotation::ReviewId, 36))
                    .col(integer(Annotation::LineNumber))
                    .col(text(Annotation::CommentText))
                    .col(timestamp(Annotation::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Annotation::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-annotations-review_id")
                            .from(Annotation::Table, Annotation::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(string_len(Notification::Id, 36).primary_key())
                    .col(string_len(Notification::UserId, 36))
                    .col(text(Notification::Message))
                    .col(boolean(Notification::IsRead).default(false))
                    .col(timestamp(Notification::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-user_id")
                            .from(Notification::Table, Notification::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_user_id")
                    .table(Submission::Table)
                    .col(Submission::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_status")
                    .table(Submission::Table)
                    .col(Submission::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_submission_id")
                    .table(Review::Table)
                    .col(Review::SubmissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_annotations_review_id")
                    .table(Annotation::Table)
                    .col(Annotation::ReviewId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Annotation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SubmissionTag::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    UserId,
    Title,
    Description,
    CodeContent,
    Language,
    Status,
    WalkthroughVideoUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tag {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum SubmissionTag {
    Table,
    SubmissionId,
    TagId,
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    SubmissionId,
    ReviewerId,
    OverallComment,
    Rating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Annotation {
    Table,
    Id,
    ReviewId,
    LineNumber,
    CommentText,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    Id,
    UserId,
    Message,
    IsRead,
    CreatedAt,
}
