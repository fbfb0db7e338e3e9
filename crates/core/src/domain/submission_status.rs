use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    Pending,
    InReview,
    Reviewed,
}

impl SubmissionStatus {
    /// Authors may only update or delete a submission while it is pending.
    pub fn is_editable(self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }

    /// The status only ever advances. Recording a review moves any
    /// pre-reviewed submission straight to `Reviewed`.
    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (SubmissionStatus::Pending, SubmissionStatus::InReview)
                | (SubmissionStatus::Pending, SubmissionStatus::Reviewed)
                | (SubmissionStatus::InReview, SubmissionStatus::Reviewed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::InReview => "in_review",
            SubmissionStatus::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "in_review" => Ok(SubmissionStatus::InReview),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            other => Err(DomainError::UnknownSubmissionStatus(other.to_string())),
        }
    }
}
