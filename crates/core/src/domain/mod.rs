mod error;
mod ids;
mod policy;
mod rating;
mod role;
mod submission_status;

pub use error::DomainError;
pub use ids::{AnnotationId, NotificationId, ReviewId, SubmissionId, TagId, UserId};
pub use policy::{Action, Actor, Denial, SubmissionRef, decide};
pub use rating::Rating;
pub use role::Role;
pub use submission_status::SubmissionStatus;
