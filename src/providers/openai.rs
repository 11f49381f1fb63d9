use super::{LLMProvider, Message};
use crate::core::error::AssistError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

#[derive(Clone)]
pub struct OpenAIProvider {
    client: HttpClient,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), api_key, model)
    }

    pub fn with_endpoint(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            client: HttpClient::new(endpoint, Some(api_key)),
            model,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let parsed: ChatCompletionResponse = self
            .client
            .post_json(self.name(), "chat/completions", &payload)
            .await?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AssistError::Api("No choices in API response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "Which cable for PIRs?"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "Use 8-core alarm cable."}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = OpenAIProvider::with_endpoint(
            server.url(),
            "sk-test".to_string(),
            "gpt-4o-mini".to_string(),
        );
        let reply = provider
            .get_response(&[
                Message::system("be brief"),
                Message::user("Which cable for PIRs?"),
            ])
            .await
            .unwrap();

        assert_eq!(reply, "Use 8-core alarm cable.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_a_provider_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":"bad key"}"#)
            .create_async()
            .await;

        let provider =
            OpenAIProvider::with_endpoint(server.url(), "wrong".to_string(), "m".to_string());
        let err = provider
            .get_response(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to get response from OpenAI");
    }

    #[tokio::test]
    async fn empty_choices_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let provider = OpenAIProvider::with_endpoint(server.url(), "k".to_string(), "m".to_string());
        let err = provider
            .get_response(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, AssistError::Api(_)));
    }
}
