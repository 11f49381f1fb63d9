use super::{LLMProvider, Message};
use crate::core::error::AssistError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

/// Self-hosted model server speaking the Ollama chat API. No authentication.
#[derive(Clone)]
pub struct OllamaProvider {
    client: HttpClient,
    model: Option<String>,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: Option<String>) -> Self {
        Self {
            client: HttpClient::new(base_url, None),
            model,
        }
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistError> {
        let payload = OllamaChatRequest {
            model: self.model.as_deref(),
            messages,
            stream: false,
        };

        let parsed: OllamaChatResponse = self
            .client
            .post_json(self.name(), "api/chat", &payload)
            .await?;

        Ok(parsed.message.content)
    }
}
