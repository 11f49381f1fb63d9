//! Per-user chat sessions and the pointer to the one being used.

pub mod store;

use crate::providers::{Message, Role};
use crate::utils::text::truncate_with_ellipsis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::SessionStore;

pub const PLACEHOLDER_TITLE: &str = "New Chat";
const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub has_welcome_message: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            has_welcome_message: false,
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }

    fn push(&mut self, message: Message) {
        if message.role == Role::User && self.has_placeholder_title() {
            self.title = truncate_with_ellipsis(&message.content, TITLE_MAX_CHARS);
        }
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    fn seed_welcome(&mut self, text: &str) -> bool {
        if self.has_welcome_message || !self.messages.is_empty() {
            return false;
        }
        self.messages.push(Message::assistant(text));
        self.has_welcome_message = true;
        self.updated_at = Utc::now();
        true
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
