use std::{sync::Arc, time::Duration};

use shared::{domain::RowKey, error::FormError};
use tokio::sync::{broadcast, Mutex};

use crate::{
    alert::AlertSink,
    api::{ActivitiesApi, HttpActivitiesApi},
    error::ClientError,
    page::Page,
};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MESSAGE_HIDE_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub message_hide_delay: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            message_hide_delay: DEFAULT_MESSAGE_HIDE_DELAY,
        }
    }
}

/// What changed on the page; front ends redraw on these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    DirectoryRendered,
    DirectoryFailed,
    RowRemoved(RowKey),
    MessageShown,
    MessageHidden,
    FormReset,
    FormRejected(FormError),
}

/// Everything the components share, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    api: Arc<dyn ActivitiesApi>,
    page: Arc<Mutex<Page>>,
    alerts: Arc<dyn AlertSink>,
    settings: ClientSettings,
    changes: broadcast::Sender<PageChange>,
}

impl AppContext {
    pub fn new(
        settings: ClientSettings,
        api: Arc<dyn ActivitiesApi>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        let (changes, _) = broadcast::channel(256);
        Self {
            api,
            page: Arc::new(Mutex::new(Page::default())),
            alerts,
            settings,
            changes,
        }
    }

    /// Builds a context talking HTTP to `settings.server_url`.
    pub fn connect(
        settings: ClientSettings,
        alerts: Arc<dyn AlertSink>,
    ) -> Result<Self, ClientError> {
        let api = HttpActivitiesApi::new(&settings.server_url)?;
        Ok(Self::new(settings, Arc::new(api), alerts))
    }

    pub fn api(&self) -> &dyn ActivitiesApi {
        self.api.as_ref()
    }

    pub fn page(&self) -> &Arc<Mutex<Page>> {
        &self.page
    }

    pub fn alerts(&self) -> &dyn AlertSink {
        self.alerts.as_ref()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub async fn snapshot(&self) -> Page {
        self.page.lock().await.clone()
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<PageChange> {
        self.changes.subscribe()
    }

    pub(crate) fn notify(&self, change: PageChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }
}
