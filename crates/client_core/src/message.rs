use tracing::debug;

use crate::context::{AppContext, PageChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageArea {
    generation: u64,
    visible: Option<Message>,
}

impl MessageArea {
    /// Makes `text` visible, replacing whatever was shown. Returns the generation the
    /// matching hide must present.
    pub fn show(&mut self, kind: MessageKind, text: impl Into<String>) -> u64 {
        self.generation += 1;
        self.visible = Some(Message {
            text: text.into(),
            kind,
        });
        self.generation
    }

    pub fn hide_if_current(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.visible.is_none() {
            return false;
        }
        self.visible = None;
        true
    }

    pub fn current(&self) -> Option<&Message> {
        self.visible.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }
}

/// A stale timer (the area was shown again meanwhile) leaves the newer message alone.
pub(crate) async fn show_message(ctx: &AppContext, kind: MessageKind, text: impl Into<String>) {
    let generation = ctx.page().lock().await.message.show(kind, text);
    ctx.notify(PageChange::MessageShown);

    let delay = ctx.settings().message_hide_delay;
    let ctx = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let hidden = ctx.page().lock().await.message.hide_if_current(generation);
        if hidden {
            ctx.notify(PageChange::MessageHidden);
        } else {
            debug!(generation, "message: stale hide timer ignored");
        }
    });
}
