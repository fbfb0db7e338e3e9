pub mod notification_repository;
pub mod review_repository;
pub mod submission_repository;
pub mod tag_repository;
pub mod user_repository;

pub use notification_repository::{
    NotificationRecord, NotificationRepository, SeaOrmNotificationRepository,
};
pub use review_repository::{
    AnnotationRecord, NewAnnotation, NewNotification, NewReview, ReviewRecord, ReviewRepository,
    ReviewerInfo, SeaOrmReviewRepository,
};
pub use submission_repository::{
    NewSubmission, SeaOrmSubmissionRepository, StatusCounts, SubmissionFilter, SubmissionListRow,
    SubmissionPage, SubmissionRecord, SubmissionRepository, SubmissionUpdate,
};
pub use tag_repository::{SeaOrmTagRepository, TagRecord, TagRepository};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};
