use crate::core::error::AssistError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod base_client;
pub mod factory;
pub mod flowise;
pub mod ollama;
pub mod openai;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat turn. Also the wire shape every provider accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Human-readable backend name used in error messages.
    fn name(&self) -> &'static str;

    /// Performs exactly one round trip and returns the assistant's reply.
    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistError>;
}
