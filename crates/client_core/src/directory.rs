use tracing::{error, info};

use crate::context::{AppContext, PageChange};

pub const LOAD_FAILURE_TEXT: &str = "Failed to load activities. Please try again later.";

#[derive(Clone)]
pub struct DirectoryClient {
    ctx: AppContext,
}

impl DirectoryClient {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Replaces the card list and the select options with the server's current snapshot.
    /// On any failure the list shows a fixed notice and the cause goes to the log only.
    pub async fn refresh(&self) {
        match self.ctx.api().fetch_activities().await {
            Ok(directory) => {
                self.ctx.page().lock().await.render_directory(&directory);
                info!(activities = directory.len(), "directory: rendered");
                self.ctx.notify(PageChange::DirectoryRendered);
            }
            Err(error) => {
                error!(%error, "directory: failed to fetch activities");
                self.ctx
                    .page()
                    .lock()
                    .await
                    .render_load_failure(LOAD_FAILURE_TEXT);
                self.ctx.notify(PageChange::DirectoryFailed);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
