//! Blocking alerts. Only unregister failures use this path; signup and directory
//! failures go through the inline message area instead.

use std::sync::{Mutex, PoisonError};

pub trait AlertSink: Send + Sync {
    fn alert(&self, text: &str);
}

/// Keeps every alert in memory until taken.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.alerts.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, text: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
