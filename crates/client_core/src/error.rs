use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server rejected request with status {status}")]
    Application { status: u16, detail: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Server-supplied reason, only present for application failures.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Application { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
