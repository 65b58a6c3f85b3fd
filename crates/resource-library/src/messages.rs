//! One-shot notices queued for a user and returned with the next rendered page.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use crate::accounts::{UserId, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// Per-user message queues. Anonymous viewers have nowhere to keep messages.
#[derive(Debug, Default)]
pub struct MessageBox {
    queues: Mutex<HashMap<UserId, Vec<FlashMessage>>>,
}

impl MessageBox {
    pub fn add(&self, viewer: &Viewer, level: MessageLevel, text: impl Into<String>) {
        let Some(user) = viewer.user() else {
            return;
        };
        let message = FlashMessage {
            level,
            text: text.into(),
        };
        match self.queues.lock() {
            Ok(mut queues) => queues.entry(user.id).or_default().push(message),
            Err(_) => {
                tracing::warn!(user = %user.username, "message queue poisoned; dropping notice")
            }
        }
    }

    /// Take every queued message for the viewer, oldest first.
    pub fn drain(&self, viewer: &Viewer) -> Vec<FlashMessage> {
        let Some(user) = viewer.user() else {
            return Vec::new();
        };
        match self.queues.lock() {
            Ok(mut queues) => queues.remove(&user.id).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}
