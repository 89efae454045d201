use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

/// Native form constraint violations; a form that fails them is never submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("please fill in the email field")]
    MissingEmail,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("please select an activity")]
    MissingActivity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not one of the offered activities")]
pub struct SelectError(pub String);
