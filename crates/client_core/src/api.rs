use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{domain::Directory, error::ErrorBody, protocol::SignupResponse};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

#[async_trait]
pub trait ActivitiesApi: Send + Sync {
    async fn fetch_activities(&self) -> Result<Directory, ClientError>;
    async fn signup(&self, activity: &str, email: &str) -> Result<SignupResponse, ClientError>;
    async fn unregister(&self, activity: &str, email: &str) -> Result<(), ClientError>;
}

pub struct HttpActivitiesApi {
    http: Client,
    base_url: Url,
}

impl HttpActivitiesApi {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url).map_err(|e| ClientError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidServerUrl {
                url: server_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn activities_url(&self, parts: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| ClientError::InvalidServerUrl {
                        url: self.base_url.to_string(),
                        reason: "url cannot carry a path".to_string(),
                    })?;
            segments.pop_if_empty().push("activities").extend(parts);
        }
        Ok(url)
    }

    /// `/activities/{activity}/{action}?email={email}` with every value percent-encoded.
    pub fn action_url(&self, activity: &str, action: &str, email: &str) -> Result<Url, ClientError> {
        let mut url = self.activities_url(&[activity, action])?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url)
    }
}

#[async_trait]
impl ActivitiesApi for HttpActivitiesApi {
    async fn fetch_activities(&self) -> Result<Directory, ClientError> {
        let url = self.activities_url(&[])?;
        debug!(%url, "api: fetching activities");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        read_json(response).await
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<SignupResponse, ClientError> {
        let url = self.action_url(activity, "signup", email)?;
        debug!(%url, "api: posting signup");
        let response = self.http.post(url).send().await?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        read_json(response).await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<(), ClientError> {
        let url = self.action_url(activity, "unregister", email)?;
        debug!(%url, "api: posting unregister");
        let response = self.http.post(url).send().await?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))
}

async fn read_failure(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return ClientError::Network(e),
    };
    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(body) => ClientError::Application {
            status,
            detail: body.detail.filter(|detail| !detail.is_empty()),
        },
        Err(e) => ClientError::Malformed(format!("status {status} with unreadable body: {e}")),
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
