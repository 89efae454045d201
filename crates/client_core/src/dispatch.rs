use shared::domain::RowKey;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    context::{AppContext, PageChange},
    directory::DirectoryClient,
    registration::RegistrationController,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PageLoaded,
    SubmitSignup,
    DeleteParticipant(RowKey),
}

#[derive(Clone)]
pub struct Dispatcher {
    ctx: AppContext,
    directory: DirectoryClient,
    registration: RegistrationController,
}

impl Dispatcher {
    pub fn new(ctx: AppContext) -> Self {
        let directory = DirectoryClient::new(ctx.clone());
        let registration = RegistrationController::new(ctx.clone(), directory.clone());
        Self {
            ctx,
            directory,
            registration,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Spawns and returns; no dedup or cancellation across in-flight events.
    pub fn dispatch(&self, event: UiEvent) -> JoinHandle<()> {
        let event_name = match &event {
            UiEvent::PageLoaded => "page_loaded",
            UiEvent::SubmitSignup => "submit_signup",
            UiEvent::DeleteParticipant(_) => "delete_participant",
        };
        debug!(event = event_name, "dispatching ui event");

        let this = self.clone();
        tokio::spawn(async move { this.handle(event).await })
    }

    async fn handle(&self, event: UiEvent) {
        match event {
            UiEvent::PageLoaded => self.directory.refresh().await,
            UiEvent::SubmitSignup => {
                let submission = self.ctx.page().lock().await.form.validate();
                match submission {
                    Ok(submission) => {
                        self.registration
                            .signup(&submission.activity, &submission.email)
                            .await
                    }
                    Err(error) => {
                        debug!(%error, "signup form not submitted");
                        self.ctx.notify(PageChange::FormRejected(error));
                    }
                }
            }
            UiEvent::DeleteParticipant(row) => {
                if !self.ctx.page().lock().await.contains_row(&row) {
                    warn!(%row, "delete requested for a row that is no longer rendered");
                    return;
                }
                self.registration.unregister(&row.activity, &row.email).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
