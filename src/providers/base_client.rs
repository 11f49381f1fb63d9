use crate::core::error::AssistError;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Thin JSON-over-HTTP client shared by the providers.
#[derive(Clone)]
pub struct HttpClient {
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpClient {
    pub fn new(endpoint: String, bearer_token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    pub async fn send_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, AssistError> {
        let client = Client::builder().build()?;
        let url = format!("{}/{}", self.endpoint, path.trim_start_matches('/'));

        let mut request = client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(token) = &self.bearer_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        debug!(%url, "sending chat request");
        let response = request.json(payload).send().await?;
        Ok(response)
    }

    /// Posts `payload` and decodes a successful JSON body.
    ///
    /// Any non-2xx status becomes `ProviderFailed` tagged with `provider`.
    pub async fn post_json<T, R>(
        &self,
        provider: &'static str,
        path: &str,
        payload: &T,
    ) -> Result<R, AssistError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send_request(path, payload).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(provider, status = status.as_u16(), %body, "provider returned an error status");
            return Err(AssistError::ProviderFailed {
                provider,
                status: status.as_u16(),
            });
        }

        let response_body = response.text().await?;
        let parsed = serde_json::from_str(&response_body)?;
        Ok(parsed)
    }
}
