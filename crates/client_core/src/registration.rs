use shared::domain::RowKey;
use tracing::{debug, error, info, warn};

use crate::{
    context::{AppContext, PageChange},
    directory::DirectoryClient,
    error::ClientError,
    message::{show_message, MessageKind},
};

pub const SIGNUP_REJECTED_TEXT: &str = "An error occurred";
pub const SIGNUP_FAILURE_TEXT: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_REJECTED_TEXT: &str = "Failed to unregister participant.";
pub const UNREGISTER_FAILURE_TEXT: &str = "Error unregistering participant.";

#[derive(Clone)]
pub struct RegistrationController {
    ctx: AppContext,
    directory: DirectoryClient,
}

impl RegistrationController {
    pub fn new(ctx: AppContext, directory: DirectoryClient) -> Self {
        Self { ctx, directory }
    }

    /// On success: confirmation message, form reset, then one full directory refresh.
    pub async fn signup(&self, activity: &str, email: &str) {
        match self.ctx.api().signup(activity, email).await {
            Ok(response) => {
                info!(activity, email, "registration: signed up");
                show_message(&self.ctx, MessageKind::Success, response.message).await;
                self.ctx.page().lock().await.form.reset();
                self.ctx.notify(PageChange::FormReset);
                self.directory.refresh().await;
            }
            Err(ClientError::Application { status, detail }) => {
                warn!(activity, email, status, ?detail, "registration: signup rejected");
                let text = detail
                    .filter(|detail| !detail.is_empty())
                    .unwrap_or_else(|| SIGNUP_REJECTED_TEXT.to_string());
                show_message(&self.ctx, MessageKind::Error, text).await;
            }
            Err(error) => {
                error!(activity, email, %error, "registration: signup failed");
                show_message(&self.ctx, MessageKind::Error, SIGNUP_FAILURE_TEXT).await;
            }
        }
    }

    /// On success only the matching row is removed; the directory is not refetched, so
    /// availability and the select options stay as last rendered.
    pub async fn unregister(&self, activity: &str, email: &str) {
        match self.ctx.api().unregister(activity, email).await {
            Ok(()) => {
                let row = RowKey::new(activity, email);
                let removed = self.ctx.page().lock().await.remove_row(&row);
                if removed {
                    info!(activity, email, "registration: unregistered");
                    self.ctx.notify(PageChange::RowRemoved(row));
                } else {
                    debug!(activity, email, "registration: row already gone");
                }
            }
            Err(ClientError::Application { status, detail }) => {
                warn!(activity, email, status, ?detail, "registration: unregister rejected");
                let text = detail
                    .as_deref()
                    .filter(|detail| !detail.is_empty())
                    .unwrap_or(UNREGISTER_REJECTED_TEXT);
                self.ctx.alerts().alert(text);
            }
            Err(error) => {
                error!(activity, email, %error, "registration: unregister failed");
                self.ctx.alerts().alert(UNREGISTER_FAILURE_TEXT);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/registration_tests.rs"]
mod tests;
