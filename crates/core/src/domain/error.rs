use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid rating: {0}. rating must be in [1, 5]")]
    InvalidRating(i32),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown submission status: {0}")]
    UnknownSubmissionStatus(String),
}
