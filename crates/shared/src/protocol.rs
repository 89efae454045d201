use serde::{Deserialize, Serialize};

/// Success body of `POST /activities/{name}/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
}
