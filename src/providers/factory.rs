use crate::config::{AssistantSettings, Provider};
use crate::core::error::AssistError;
use crate::providers::{
    LLMProvider, flowise::FlowiseProvider, ollama::OllamaProvider, openai::OpenAIProvider,
};
use std::collections::HashMap;

type ProviderCreator =
    Box<dyn Fn(&AssistantSettings) -> Result<Box<dyn LLMProvider>, AssistError> + Send + Sync>;

fn required(value: &Option<String>, field: &str, provider: Provider) -> Result<String, AssistError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AssistError::Config(format!(
                "{} requires `{}` to be set",
                provider.display_name(),
                field
            ))
        })
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();

        creators.insert(
            Provider::OpenAI,
            Box::new(|settings: &AssistantSettings| {
                let api_key = required(&settings.api_key, "api_key", Provider::OpenAI)?;
                let model = required(&settings.model_name, "model_name", Provider::OpenAI)?;
                let provider = match optional(&settings.openai_base_url) {
                    Some(base_url) => OpenAIProvider::with_endpoint(base_url, api_key, model),
                    None => OpenAIProvider::new(api_key, model),
                };
                Ok(Box::new(provider) as Box<dyn LLMProvider>)
            }) as ProviderCreator,
        );

        creators.insert(
            Provider::Ollama,
            Box::new(|settings: &AssistantSettings| {
                let api_url = required(&settings.api_url, "api_url", Provider::Ollama)?;
                let provider = OllamaProvider::new(api_url, optional(&settings.model_name));
                Ok(Box::new(provider) as Box<dyn LLMProvider>)
            }) as ProviderCreator,
        );

        creators.insert(
            Provider::Flowise,
            Box::new(|settings: &AssistantSettings| {
                let host = required(&settings.flowise_api_host, "flowise_api_host", Provider::Flowise)?;
                let chatflow_id = required(
                    &settings.flowise_chatflow_id,
                    "flowise_chatflow_id",
                    Provider::Flowise,
                )?;
                Ok(Box::new(FlowiseProvider::new(host, chatflow_id)) as Box<dyn LLMProvider>)
            }) as ProviderCreator,
        );

        Self { creators }
    }

    /// Builds the provider the settings select. Fails without touching the
    /// network when the provider is unknown or a required field is missing.
    pub fn create(&self, settings: &AssistantSettings) -> Result<Box<dyn LLMProvider>, AssistError> {
        let provider = settings.resolve_provider()?;
        self.creators
            .get(&provider)
            .ok_or_else(|| AssistError::InvalidProvider(settings.provider.clone()))
            .and_then(|creator| creator(settings))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> AssistantSettings {
        AssistantSettings {
            enabled: true,
            provider: provider.to_string(),
            ..AssistantSettings::default()
        }
    }

    #[test]
    fn openai_requires_key_and_model() {
        let factory = ProviderFactory::new();
        let mut s = settings("openai");
        s.api_key = Some("sk".to_string());

        let err = factory.create(&s).err().unwrap();
        assert!(err.to_string().contains("model_name"));

        s.model_name = Some("gpt-4o-mini".to_string());
        assert_eq!(factory.create(&s).unwrap().name(), "OpenAI");
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let mut s = settings("ollama");
        s.api_url = Some("   ".to_string());
        let err = ProviderFactory::new().create(&s).err().unwrap();
        assert!(matches!(err, AssistError::Config(_)));
    }

    #[test]
    fn flowise_requires_host_and_flow() {
        let factory = ProviderFactory::new();
        let mut s = settings("Flowise");
        s.flowise_api_host = Some("http://flow.local".to_string());
        assert!(factory.create(&s).is_err());

        s.flowise_chatflow_id = Some("abc".to_string());
        assert_eq!(factory.create(&s).unwrap().name(), "Flowise");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = ProviderFactory::new().create(&settings("gemini")).err().unwrap();
        assert!(matches!(err, AssistError::InvalidProvider(_)));
    }
}
