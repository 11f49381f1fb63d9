use super::{LLMProvider, Message};
use crate::core::error::AssistError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const NO_RESPONSE_TEXT: &str = "Sorry, I could not generate a response.";

#[derive(Serialize)]
struct PredictionRequest<'a> {
    question: &'a str,
    history: &'a [Message],
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PredictionResponse {
    text: Option<String>,
    response: Option<String>,
}

impl PredictionResponse {
    fn into_reply(self) -> String {
        self.text
            .filter(|t| !t.is_empty())
            .or(self.response.filter(|r| !r.is_empty()))
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())
    }
}

/// Visual-flow chat backend. The newest message travels as `question`,
/// everything before it as `history`.
#[derive(Clone)]
pub struct FlowiseProvider {
    client: HttpClient,
    chatflow_id: String,
}

impl FlowiseProvider {
    pub fn new(api_host: String, chatflow_id: String) -> Self {
        Self {
            client: HttpClient::new(api_host, None),
            chatflow_id,
        }
    }
}

#[async_trait]
impl LLMProvider for FlowiseProvider {
    fn name(&self) -> &'static str {
        "Flowise"
    }

    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistError> {
        let (latest, history) = messages
            .split_last()
            .ok_or_else(|| AssistError::Input("No message to send".to_string()))?;

        let payload = PredictionRequest {
            question: &latest.content,
            history,
        };
        let path = format!("api/v1/prediction/{}", self.chatflow_id);

        let parsed: PredictionResponse = self.client.post_json(self.name(), &path, &payload).await?;
        Ok(parsed.into_reply())
    }
}
