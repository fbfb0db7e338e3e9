//! Authorization decisions, independent of the transport layer.
//!
//! Every handler asks `decide` before touching storage, so the rules can be
//! unit-tested without a database or an HTTP stack.

use thiserror::Error;

use super::{Role, SubmissionStatus, UserId};

/// The authenticated caller, reduced to what authorization needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

/// The slice of a submission that authorization decisions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionRef {
    pub author_id: UserId,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    CreateSubmission,
    ViewSubmission(&'a SubmissionRef),
    UpdateSubmission(&'a SubmissionRef),
    DeleteSubmission(&'a SubmissionRef),
    CreateReview,
    ViewReviews(&'a SubmissionRef),
    AttachVideo(&'a SubmissionRef),
    RemoveVideo(&'a SubmissionRef),
    ViewAnalytics,
}

/// Why an action was denied. `Forbidden` is an authorization failure;
/// `InvalidState` means the actor is allowed but the submission lifecycle
/// forbids the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    InvalidState(&'static str),
}

pub fn decide(actor: &Actor, action: Action<'_>) -> Result<(), Denial> {
    match action {
        Action::CreateSubmission => {
            if actor.role == Role::Student {
                Ok(())
            } else {
                Err(Denial::Forbidden("Only students can create submissions."))
            }
        }
        Action::ViewSubmission(submission) => {
            if actor.role == Role::Student && submission.author_id != actor.id {
                Err(Denial::Forbidden("Not authorized."))
            } else {
                Ok(())
            }
        }
        Action::UpdateSubmission(submission) => {
            if submission.author_id != actor.id {
                Err(Denial::Forbidden(
                    "Not authorized to update this submission.",
                ))
            } else if !submission.status.is_editable() {
                Err(Denial::InvalidState(
                    "Only pending submissions can be updated.",
                ))
            } else {
                Ok(())
            }
        }
        Action::DeleteSubmission(submission) => {
            if submission.author_id != actor.id {
                Err(Denial::Forbidden(
                    "Not authorized to delete this submission.",
                ))
            } else if !submission.status.is_editable() {
                Err(Denial::InvalidState(
                    "Only pending submissions can be deleted.",
                ))
            } else {
                Ok(())
            }
        }
        Action::CreateReview => {
            if actor.role == Role::Mentor {
                Ok(())
            } else {
                Err(Denial::Forbidden("Only mentors can create reviews."))
            }
        }
        Action::ViewReviews(submission) => {
            if actor.role == Role::Student && submission.author_id != actor.id {
                Err(Denial::Forbidden(
                    "Not authorized to view reviews for this submission.",
                ))
            } else {
                Ok(())
            }
        }
        Action::AttachVideo(submission) => {
            if submission.author_id == actor.id {
                Ok(())
            } else {
                Err(Denial::Forbidden(
                    "You can only upload videos for your own submissions.",
                ))
            }
        }
        Action::RemoveVideo(submission) => {
            if submission.author_id == actor.id {
                Ok(())
            } else {
                Err(Denial::Forbidden("Not authorized to delete this video."))
            }
        }
        Action::ViewAnalytics => {
            if actor.role == Role::Student {
                Err(Denial::Forbidden("Not authorized."))
            } else {
                Ok(())
            }
        }
    }
}
