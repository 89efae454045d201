//! Client side of the activity sign-up page: backend access, the page model, and the
//! components that keep the two in sync.

pub mod alert;
pub mod api;
pub mod context;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod page;
pub mod registration;

pub use alert::{AlertSink, RecordingAlerts};
pub use api::{ActivitiesApi, HttpActivitiesApi};
pub use context::{AppContext, ClientSettings, PageChange};
pub use directory::DirectoryClient;
pub use dispatch::{Dispatcher, UiEvent};
pub use error::ClientError;
pub use message::{Message, MessageArea, MessageKind};
pub use page::Page;
pub use registration::RegistrationController;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
